#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::fsm::*;
    use crate::timeline::Timeline;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Amber,
        Broken,
    }

    const ALL: [Light; 3] = [Light::Red, Light::Green, Light::Amber];

    /// Records every hook call. Amber holds for 2 s then returns to Red.
    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
        go_green: bool,
    }

    struct TrafficRules;

    impl StateBehavior<Light, Log> for TrafficRules {
        fn enter(&self, state: Light, ctx: &mut Log) -> Directive<Light> {
            ctx.calls.push(format!("enter {state:?}"));
            match state {
                Light::Amber => Directive::GoToAfter {
                    target: Light::Red,
                    delay: 2.0,
                    guard: DelayGuard::Unchanged,
                },
                _ => Directive::Stay,
            }
        }

        fn execute(&self, state: Light, ctx: &mut Log) -> Directive<Light> {
            ctx.calls.push(format!("execute {state:?}"));
            if state == Light::Red && ctx.go_green {
                Directive::GoTo(Light::Green)
            } else {
                Directive::Stay
            }
        }

        fn exit(&self, state: Light, ctx: &mut Log) {
            ctx.calls.push(format!("exit {state:?}"));
        }
    }

    /// Every state immediately directs to the next one, forever.
    struct Spinner;

    impl StateBehavior<Light, ()> for Spinner {
        fn enter(&self, state: Light, _ctx: &mut ()) -> Directive<Light> {
            Directive::GoTo(match state {
                Light::Red => Light::Green,
                Light::Green => Light::Amber,
                _ => Light::Red,
            })
        }
    }

    /// Red's entry chains straight through Green into Amber.
    struct Cascade;

    impl StateBehavior<Light, ()> for Cascade {
        fn enter(&self, state: Light, _ctx: &mut ()) -> Directive<Light> {
            match state {
                Light::Red => Directive::GoTo(Light::Green),
                Light::Green => Directive::GoTo(Light::Amber),
                _ => Directive::Stay,
            }
        }
    }

    fn machine() -> FiniteStateMachine<Light> {
        FiniteStateMachine::new(ALL, None)
    }

    #[test]
    fn test_first_transition_has_no_exit() {
        let mut fsm = machine();
        let mut log = Log::default();
        let changes = fsm.go_to_state(Light::Red, &TrafficRules, &mut log, 0.0);

        assert_eq!(changes, vec![StateChange { from: None, to: Light::Red }]);
        assert_eq!(log.calls, vec!["enter Red"]);
        assert!(fsm.is_in(Light::Red));
        assert_eq!(fsm.epoch(), 1);
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.go_to_state(Light::Red, &TrafficRules, &mut log, 0.0);
        log.calls.clear();

        fsm.go_to_state(Light::Green, &TrafficRules, &mut log, 0.0);
        assert_eq!(log.calls, vec!["exit Red", "enter Green"]);
    }

    #[test]
    fn test_same_state_is_noop() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.go_to_state(Light::Green, &TrafficRules, &mut log, 0.0);
        log.calls.clear();

        let changes = fsm.go_to_state(Light::Green, &TrafficRules, &mut log, 0.0);
        assert!(changes.is_empty(), "re-entering the current state must not transition");
        assert!(log.calls.is_empty(), "no hooks run on a no-op transition");
        assert_eq!(fsm.epoch(), 1);
    }

    #[test]
    fn test_listeners_see_every_change() {
        let mut fsm = machine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        fsm.subscribe(move |change| sink.lock().unwrap().push(*change));

        fsm.go_to_state(Light::Red, &Cascade, &mut (), 0.0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3, "Red -> Green -> Amber chain, got {seen:?}");
        assert_eq!(seen[2], StateChange { from: Some(Light::Green), to: Light::Amber });
        assert!(fsm.is_in(Light::Amber));
    }

    #[test]
    #[should_panic(expected = "transition chain exceeded")]
    fn test_transition_loop_panics() {
        let mut fsm = machine();
        fsm.go_to_state(Light::Red, &Spinner, &mut (), 0.0);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unregistered_state_panics() {
        let mut fsm = machine();
        assert!(fsm.is_registered(Light::Amber));
        assert!(!fsm.is_registered(Light::Broken));
        fsm.go_to_state(Light::Broken, &Cascade, &mut (), 0.0);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unregistered_initial_state_panics() {
        let _ = FiniteStateMachine::new(ALL, Some(Light::Broken));
    }

    #[test]
    fn test_delayed_transition_fires_when_due() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.go_to_state(Light::Amber, &TrafficRules, &mut log, 10.0);
        assert_eq!(fsm.pending_len(), 1);
        assert_eq!(fsm.next_due(), Some(12.0));

        fsm.step(&TrafficRules, &mut log, 11.9);
        assert!(fsm.is_in(Light::Amber), "revert must not fire early");

        let changes = fsm.step(&TrafficRules, &mut log, 12.0);
        assert_eq!(changes, vec![StateChange { from: Some(Light::Amber), to: Light::Red }]);
        assert_eq!(fsm.pending_len(), 0);
    }

    #[test]
    fn test_unchanged_guard_drops_stale_transition() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.go_to_state(Light::Amber, &TrafficRules, &mut log, 0.0);
        fsm.go_to_state(Light::Green, &TrafficRules, &mut log, 1.0);

        let changes = fsm.step(&TrafficRules, &mut log, 5.0);
        assert!(changes.is_empty(), "stale revert must be dropped, got {changes:?}");
        assert!(fsm.is_in(Light::Green));
        assert_eq!(fsm.pending_len(), 0, "dropped entries leave the timeline");
    }

    #[test]
    fn test_reentry_schedules_fresh_revert() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.go_to_state(Light::Amber, &TrafficRules, &mut log, 0.0);
        fsm.go_to_state(Light::Green, &TrafficRules, &mut log, 1.0);
        fsm.go_to_state(Light::Amber, &TrafficRules, &mut log, 1.5);

        fsm.step(&TrafficRules, &mut log, 2.0);
        assert!(fsm.is_in(Light::Amber), "first revert is stale");
        fsm.step(&TrafficRules, &mut log, 3.5);
        assert!(fsm.is_in(Light::Red), "second revert fires at 1.5 + 2");
    }

    #[test]
    fn test_while_in_guard() {
        let mut fsm = FiniteStateMachine::new(ALL, Some(Light::Green));
        fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::WhileIn(Light::Amber), 0.0);
        let changes = fsm.fire_due(&Cascade, &mut (), 1.0);
        assert!(changes.is_empty());
        assert!(fsm.is_in(Light::Green));

        fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::WhileIn(Light::Green), 1.0);
        fsm.fire_due(&TrafficRules, &mut Log::default(), 2.0);
        assert!(fsm.is_in(Light::Red));
    }

    #[test]
    fn test_always_guard_survives_transitions() {
        let mut fsm = FiniteStateMachine::new(ALL, Some(Light::Green));
        let mut log = Log::default();
        fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::Always, 0.0);
        fsm.go_to_state(Light::Amber, &TrafficRules, &mut log, 0.5);
        fsm.fire_due(&TrafficRules, &mut log, 1.0);
        assert!(fsm.is_in(Light::Red));
    }

    #[test]
    fn test_delayed_requests_coalesce() {
        let mut fsm = FiniteStateMachine::new(ALL, Some(Light::Green));
        assert!(fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::Unchanged, 0.0));
        assert!(!fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::Unchanged, 0.1));
        assert!(fsm.go_to_state_with_delay(Light::Amber, 1.0, DelayGuard::Unchanged, 0.1));
        assert_eq!(fsm.pending_len(), 2);
        assert!(fsm.has_pending(Light::Red));
    }

    #[test]
    fn test_cancel_pending() {
        let mut fsm = FiniteStateMachine::new(ALL, Some(Light::Green));
        fsm.go_to_state_with_delay(Light::Red, 1.0, DelayGuard::Always, 0.0);
        fsm.cancel_pending();
        fsm.fire_due(&Cascade, &mut (), 10.0);
        assert!(fsm.is_in(Light::Green));
    }

    #[test]
    fn test_execute_directive_applies() {
        let mut fsm = FiniteStateMachine::new(ALL, Some(Light::Red));
        let mut log = Log {
            go_green: true,
            ..Default::default()
        };
        let changes = fsm.step(&TrafficRules, &mut log, 0.0);
        assert_eq!(changes.len(), 1);
        assert!(fsm.is_in(Light::Green));
        assert_eq!(log.calls, vec!["execute Red", "exit Red", "enter Green"]);
    }

    #[test]
    fn test_step_without_state_does_nothing() {
        let mut fsm = machine();
        let mut log = Log::default();
        assert!(fsm.step(&TrafficRules, &mut log, 0.0).is_empty());
        assert!(log.calls.is_empty());
    }

    // ---- Timeline ----

    #[test]
    fn test_timeline_orders_by_due_then_sequence() {
        let mut timeline = Timeline::new();
        timeline.schedule(2.0, "late");
        timeline.schedule(1.0, "first");
        timeline.schedule(1.0, "second");

        assert_eq!(timeline.peek_due(), Some(1.0));
        assert_eq!(timeline.pop_due(0.5), None);
        assert_eq!(timeline.pop_due(1.0), Some("first"));
        assert_eq!(timeline.pop_due(1.0), Some("second"));
        assert_eq!(timeline.pop_due(1.5), None);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.pop_due(5.0), Some("late"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_timeline_clear() {
        let mut timeline = Timeline::new();
        timeline.schedule(1.0, 1);
        timeline.schedule(2.0, 2);
        timeline.clear();
        assert_eq!(timeline.len(), 0);
        assert_eq!(timeline.peek_due(), None);
    }
}
