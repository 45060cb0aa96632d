//! Per-actor lifecycle: Spawn -> Game -> Despawn, with wrap-around respawn.
//!
//! | state   | ring, stage     | result                         |
//! |---------|-----------------|--------------------------------|
//! | Spawn   | !ring, stage    | Game after the grace delay     |
//! | Spawn   | !ring, !stage   | Despawn                        |
//! | Game    | any, !stage     | Despawn                        |
//! | Despawn | (on enter)      | respawn at antipode or destroy |
//!
//! Every other combination stays put.

use glam::DVec3;
use tracing::debug;

use skywriters_core::constants::SPAWN_GRACE_SECS;
use skywriters_core::enums::LifecycleState;
use skywriters_core::types::antipodal_point;
use skywriters_fsm::{DelayGuard, Directive, FiniteStateMachine, StateBehavior, StateChange};

use crate::regions::RegionTest;

/// What the Despawn state decided for the actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleOutcome {
    Respawned { from: DVec3, to: DVec3 },
    Destroy,
}

/// Everything the lifecycle hooks read or change for one actor.
pub struct EntityCtx<'a> {
    pub position: DVec3,
    pub respawn_on_exit: bool,
    pub center: DVec3,
    pub regions: &'a dyn RegionTest,
    pub outcome: Option<LifecycleOutcome>,
}

impl<'a> EntityCtx<'a> {
    pub fn new(
        position: DVec3,
        respawn_on_exit: bool,
        center: DVec3,
        regions: &'a dyn RegionTest,
    ) -> Self {
        Self {
            position,
            respawn_on_exit,
            center,
            regions,
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LifecycleRules {
    pub grace_secs: f64,
}

impl Default for LifecycleRules {
    fn default() -> Self {
        Self {
            grace_secs: SPAWN_GRACE_SECS,
        }
    }
}

impl<'a> StateBehavior<LifecycleState, EntityCtx<'a>> for LifecycleRules {
    fn enter(&self, state: LifecycleState, ctx: &mut EntityCtx<'a>) -> Directive<LifecycleState> {
        match state {
            LifecycleState::Spawn | LifecycleState::Game => Directive::Stay,
            LifecycleState::Despawn => {
                if ctx.respawn_on_exit {
                    let from = ctx.position;
                    let to = antipodal_point(ctx.center, from);
                    ctx.position = to;
                    ctx.outcome = Some(LifecycleOutcome::Respawned { from, to });
                    Directive::GoTo(LifecycleState::Spawn)
                } else {
                    ctx.outcome = Some(LifecycleOutcome::Destroy);
                    Directive::Stay
                }
            }
        }
    }

    fn execute(&self, state: LifecycleState, ctx: &mut EntityCtx<'a>) -> Directive<LifecycleState> {
        let ring = ctx.regions.inside_spawn_ring(ctx.position);
        let stage = ctx.regions.inside_stage(ctx.position);
        match state {
            LifecycleState::Spawn => match (ring, stage) {
                (false, true) => Directive::GoToAfter {
                    target: LifecycleState::Game,
                    delay: self.grace_secs,
                    guard: DelayGuard::Unchanged,
                },
                (false, false) => Directive::GoTo(LifecycleState::Despawn),
                _ => Directive::Stay,
            },
            LifecycleState::Game if !stage => Directive::GoTo(LifecycleState::Despawn),
            LifecycleState::Game | LifecycleState::Despawn => Directive::Stay,
        }
    }
}

/// ECS component wrapping one actor's lifecycle machine.
#[derive(Debug)]
pub struct Lifecycle {
    machine: FiniteStateMachine<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Starts in Spawn.
    pub fn new() -> Self {
        Self::starting_in(LifecycleState::Spawn)
    }

    /// Start in `state` without running its entry hook.
    pub fn starting_in(state: LifecycleState) -> Self {
        Self {
            machine: FiniteStateMachine::new(LifecycleState::ALL, Some(state)),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.machine.current().unwrap_or_default()
    }

    pub fn machine(&self) -> &FiniteStateMachine<LifecycleState> {
        &self.machine
    }

    /// Run one tick of the rules against `ctx`.
    pub fn step(
        &mut self,
        rules: &LifecycleRules,
        ctx: &mut EntityCtx<'_>,
        now: f64,
    ) -> Vec<StateChange<LifecycleState>> {
        let changes = self.machine.step(rules, ctx, now);
        for change in &changes {
            debug!(from = ?change.from, to = ?change.to, "lifecycle changed");
        }
        changes
    }
}
