//! Spawn point state machines laid over the ring topology.

use glam::DVec3;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use skywriters_core::enums::SpawnPointState;
use skywriters_core::events::SimEvent;
use skywriters_fsm::{DelayGuard, Directive, FiniteStateMachine, StateBehavior};

use crate::ring::RingTopology;

/// A state change on one spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransition {
    pub index: usize,
    pub from: Option<SpawnPointState>,
    pub to: SpawnPointState,
}

impl PointTransition {
    /// Event form. The initial entry of a point has no event.
    pub fn to_event(&self) -> Option<SimEvent> {
        self.from.map(|from| SimEvent::SpawnPointChanged {
            index: self.index,
            from,
            to: self.to,
        })
    }
}

/// Spawning holds a point for `revert_delay` seconds, then frees it.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPointRules {
    pub revert_delay: f64,
}

impl StateBehavior<SpawnPointState, ()> for SpawnPointRules {
    fn enter(&self, state: SpawnPointState, _ctx: &mut ()) -> Directive<SpawnPointState> {
        match state {
            SpawnPointState::Spawning => Directive::GoToAfter {
                target: SpawnPointState::Available,
                delay: self.revert_delay,
                guard: DelayGuard::Unchanged,
            },
            SpawnPointState::Available | SpawnPointState::Disabled => Directive::Stay,
        }
    }
}

#[derive(Debug)]
pub struct SpawnPoint {
    pub index: usize,
    pub position: DVec3,
    machine: FiniteStateMachine<SpawnPointState>,
}

impl SpawnPoint {
    pub fn state(&self) -> SpawnPointState {
        self.machine.current().unwrap_or_default()
    }

    /// Whether a revert to Available is scheduled.
    pub fn has_pending_revert(&self) -> bool {
        self.machine.has_pending(SpawnPointState::Available)
    }
}

/// The ring topology plus one state machine per point.
#[derive(Debug)]
pub struct SpawnRing {
    topology: RingTopology,
    points: Vec<SpawnPoint>,
    rules: SpawnPointRules,
}

impl SpawnRing {
    /// Every point enters `initial` at time `now`.
    pub fn new(
        topology: RingTopology,
        initial: SpawnPointState,
        revert_delay: f64,
        now: f64,
    ) -> Self {
        let rules = SpawnPointRules { revert_delay };
        let points = topology
            .points()
            .iter()
            .enumerate()
            .map(|(index, position)| {
                let mut machine = FiniteStateMachine::new(SpawnPointState::ALL, None);
                machine.go_to_state(initial, &rules, &mut (), now);
                SpawnPoint {
                    index,
                    position: *position,
                    machine,
                }
            })
            .collect();
        Self {
            topology,
            points,
            rules,
        }
    }

    pub fn topology(&self) -> &RingTopology {
        &self.topology
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SpawnPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> &SpawnPoint {
        self.assert_index(index);
        &self.points[index]
    }

    pub fn state(&self, index: usize) -> SpawnPointState {
        self.point(index).state()
    }

    pub fn position(&self, index: usize) -> DVec3 {
        self.point(index).position
    }

    pub fn states(&self) -> Vec<SpawnPointState> {
        self.points.iter().map(SpawnPoint::state).collect()
    }

    pub fn indices_in_state(&self, state: SpawnPointState) -> Vec<usize> {
        self.points
            .iter()
            .filter(|p| p.state() == state)
            .map(|p| p.index)
            .collect()
    }

    /// Uniformly random index among the points in `state`.
    pub fn random_in_state<R: Rng + ?Sized>(
        &self,
        state: SpawnPointState,
        rng: &mut R,
    ) -> Option<usize> {
        self.indices_in_state(state).choose(rng).copied()
    }

    /// Force one point into `state`. Re-entering the current state is a
    /// no-op and leaves any scheduled revert untouched.
    pub fn go_to_state(
        &mut self,
        index: usize,
        state: SpawnPointState,
        now: f64,
    ) -> Vec<PointTransition> {
        self.assert_index(index);
        let rules = self.rules;
        let changes = self.points[index]
            .machine
            .go_to_state(state, &rules, &mut (), now);
        changes
            .into_iter()
            .map(|change| {
                debug!(index, from = ?change.from, to = ?change.to, "spawn point changed");
                PointTransition {
                    index,
                    from: change.from,
                    to: change.to,
                }
            })
            .collect()
    }

    /// Put a point into Spawning with no revert scheduled. The point stays
    /// Spawning until something else moves it.
    pub fn hold_spawning(&mut self, index: usize, now: f64) -> Vec<PointTransition> {
        let transitions = self.go_to_state(index, SpawnPointState::Spawning, now);
        self.points[index].machine.cancel_pending();
        transitions
    }

    pub fn set_states(
        &mut self,
        indices: &[usize],
        state: SpawnPointState,
        now: f64,
    ) -> Vec<PointTransition> {
        indices
            .iter()
            .flat_map(|&index| self.go_to_state(index, state, now))
            .collect()
    }

    /// Fire every revert that is due at `now`.
    pub fn advance(&mut self, now: f64) -> Vec<PointTransition> {
        let rules = self.rules;
        let mut transitions = Vec::new();
        for point in &mut self.points {
            for change in point.machine.fire_due(&rules, &mut (), now) {
                debug!(index = point.index, to = ?change.to, "spawn point reverted");
                transitions.push(PointTransition {
                    index: point.index,
                    from: change.from,
                    to: change.to,
                });
            }
        }
        transitions
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.points.len(),
            "spawn point index {index} must exist (ring has {} points)",
            self.points.len()
        );
    }
}
