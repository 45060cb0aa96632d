//! Generic finite state machine with guarded, delayed transitions.
//!
//! The machine holds no behaviour. Callers pass a [`StateBehavior`] and a
//! context into every call that may run hooks, which keeps the machine
//! `Send + Sync` plain data with no borrowed references.

use std::fmt;

use crate::timeline::Timeline;

/// Longest chain of `enter` directives followed by a single call before the
/// machine treats it as a transition loop.
pub const MAX_TRANSITION_CHAIN: usize = 8;

/// What a hook asks the machine to do next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive<S> {
    Stay,
    GoTo(S),
    GoToAfter {
        target: S,
        delay: f64,
        guard: DelayGuard<S>,
    },
}

/// Condition checked when a delayed transition comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayGuard<S> {
    /// Always fires.
    Always,
    /// Fires only if the machine is still in the given state.
    WhileIn(S),
    /// Fires only if no transition happened since it was scheduled.
    Unchanged,
}

/// A completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<S> {
    pub from: Option<S>,
    pub to: S,
}

/// Per-state hooks, dispatched by matching on the state id.
pub trait StateBehavior<S, C: ?Sized> {
    fn enter(&self, _state: S, _ctx: &mut C) -> Directive<S> {
        Directive::Stay
    }

    fn execute(&self, _state: S, _ctx: &mut C) -> Directive<S> {
        Directive::Stay
    }

    fn exit(&self, _state: S, _ctx: &mut C) {}
}

#[derive(Debug, Clone, Copy)]
struct Pending<S> {
    target: S,
    guard: DelayGuard<S>,
    epoch: u64,
}

type Listener<S> = Box<dyn Fn(&StateChange<S>) + Send + Sync>;

pub struct FiniteStateMachine<S> {
    states: Vec<S>,
    current: Option<S>,
    /// Incremented on every completed transition.
    epoch: u64,
    timeline: Timeline<Pending<S>>,
    listeners: Vec<Listener<S>>,
}

impl<S: Copy + Eq + fmt::Debug> FiniteStateMachine<S> {
    /// Build a machine over `states`. The initial state is set without
    /// running its `enter` hook; pass `None` and call
    /// [`go_to_state`](Self::go_to_state) to start with a full entry.
    pub fn new(states: impl IntoIterator<Item = S>, initial: Option<S>) -> Self {
        let mut registered: Vec<S> = Vec::new();
        for state in states {
            if !registered.contains(&state) {
                registered.push(state);
            }
        }
        if let Some(state) = initial {
            assert!(
                registered.contains(&state),
                "state {state:?} is not registered with this machine"
            );
        }
        Self {
            states: registered,
            current: initial,
            epoch: 0,
            timeline: Timeline::new(),
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == Some(state)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn is_registered(&self, state: S) -> bool {
        self.states.contains(&state)
    }

    pub fn pending_len(&self) -> usize {
        self.timeline.len()
    }

    /// Whether a delayed transition to `target` is scheduled.
    pub fn has_pending(&self, target: S) -> bool {
        self.timeline.iter().any(|p| p.target == target)
    }

    /// Due time of the earliest scheduled transition.
    pub fn next_due(&self) -> Option<f64> {
        self.timeline.peek_due()
    }

    /// Register a callback invoked after every completed transition.
    pub fn subscribe(&mut self, listener: impl Fn(&StateChange<S>) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn cancel_pending(&mut self) {
        self.timeline.clear();
    }

    /// Transition to `target` immediately, running `exit` then `enter` and
    /// applying whatever `enter` directs. Returns every transition made, in
    /// order; empty if the machine was already in `target`.
    pub fn go_to_state<C: ?Sized, B: StateBehavior<S, C> + ?Sized>(
        &mut self,
        target: S,
        behavior: &B,
        ctx: &mut C,
        now: f64,
    ) -> Vec<StateChange<S>> {
        let mut changes = Vec::new();
        self.transition(target, behavior, ctx, now, 0, &mut changes);
        changes
    }

    /// Schedule a transition to `target` at `now + delay`.
    ///
    /// Returns `false` if a transition to the same target was already
    /// scheduled since the last completed transition.
    pub fn go_to_state_with_delay(
        &mut self,
        target: S,
        delay: f64,
        guard: DelayGuard<S>,
        now: f64,
    ) -> bool {
        self.assert_registered(target);
        if let DelayGuard::WhileIn(state) = guard {
            self.assert_registered(state);
        }
        let epoch = self.epoch;
        if self
            .timeline
            .iter()
            .any(|p| p.target == target && p.epoch == epoch)
        {
            return false;
        }
        self.timeline.schedule(
            now + delay.max(0.0),
            Pending {
                target,
                guard,
                epoch,
            },
        );
        true
    }

    /// Fire due delayed transitions, then run `execute` on the current state.
    pub fn step<C: ?Sized, B: StateBehavior<S, C> + ?Sized>(
        &mut self,
        behavior: &B,
        ctx: &mut C,
        now: f64,
    ) -> Vec<StateChange<S>> {
        let mut changes = self.fire_due(behavior, ctx, now);
        if let Some(state) = self.current {
            let directive = behavior.execute(state, ctx);
            self.apply(directive, behavior, ctx, now, 0, &mut changes);
        }
        changes
    }

    /// Fire due delayed transitions without running `execute`.
    pub fn fire_due<C: ?Sized, B: StateBehavior<S, C> + ?Sized>(
        &mut self,
        behavior: &B,
        ctx: &mut C,
        now: f64,
    ) -> Vec<StateChange<S>> {
        let mut changes = Vec::new();
        while let Some(pending) = self.timeline.pop_due(now) {
            let passes = match pending.guard {
                DelayGuard::Always => true,
                DelayGuard::WhileIn(state) => self.current == Some(state),
                DelayGuard::Unchanged => pending.epoch == self.epoch,
            };
            if passes {
                self.transition(pending.target, behavior, ctx, now, 0, &mut changes);
            } else {
                tracing::trace!(state = ?pending.target, "delayed transition dropped by guard");
            }
        }
        changes
    }

    fn transition<C: ?Sized, B: StateBehavior<S, C> + ?Sized>(
        &mut self,
        target: S,
        behavior: &B,
        ctx: &mut C,
        now: f64,
        depth: usize,
        changes: &mut Vec<StateChange<S>>,
    ) {
        self.assert_registered(target);
        if self.current == Some(target) {
            return;
        }
        assert!(
            depth <= MAX_TRANSITION_CHAIN,
            "transition chain exceeded {MAX_TRANSITION_CHAIN} steps while entering {target:?}"
        );

        let from = self.current;
        if let Some(state) = from {
            behavior.exit(state, ctx);
        }
        self.current = Some(target);
        self.epoch += 1;
        let directive = behavior.enter(target, ctx);

        let change = StateChange { from, to: target };
        tracing::trace!(?from, to = ?target, "state changed");
        for listener in &self.listeners {
            listener(&change);
        }
        changes.push(change);

        self.apply(directive, behavior, ctx, now, depth + 1, changes);
    }

    fn apply<C: ?Sized, B: StateBehavior<S, C> + ?Sized>(
        &mut self,
        directive: Directive<S>,
        behavior: &B,
        ctx: &mut C,
        now: f64,
        depth: usize,
        changes: &mut Vec<StateChange<S>>,
    ) {
        match directive {
            Directive::Stay => {}
            Directive::GoTo(target) => {
                self.transition(target, behavior, ctx, now, depth, changes)
            }
            Directive::GoToAfter {
                target,
                delay,
                guard,
            } => {
                self.go_to_state_with_delay(target, delay, guard, now);
            }
        }
    }

    fn assert_registered(&self, state: S) {
        assert!(
            self.states.contains(&state),
            "state {state:?} is not registered with this machine"
        );
    }
}

impl<S: fmt::Debug> fmt::Debug for FiniteStateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteStateMachine")
            .field("current", &self.current)
            .field("epoch", &self.epoch)
            .field("pending", &self.timeline.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
