//! ECS components for hecs entities.
//!
//! Components are plain data structs. Lifecycle state machines live in the
//! sim crate because they carry scheduling state.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::EntityClass;
use crate::types::Color;

/// World position of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// Identity and rules of a stage actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEntity {
    pub class: EntityClass,
    /// Wrap to the antipodal point instead of being destroyed on exit.
    pub respawn_on_exit: bool,
    /// Seconds the actor may live; `None` for unbounded.
    pub lifespan_secs: Option<f64>,
    /// Simulation time at creation.
    pub spawned_at: f64,
    /// Number of antipodal wraps performed so far.
    pub respawn_count: u32,
}

impl StageEntity {
    pub fn is_expired(&self, now: f64) -> bool {
        match self.lifespan_secs {
            Some(lifespan) => now - self.spawned_at >= lifespan,
            None => false,
        }
    }
}

/// Colour assigned at creation (clouds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint(pub Color);
