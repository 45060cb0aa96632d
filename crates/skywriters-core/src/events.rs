//! Events emitted by the simulation for diagnostics and presentation layers.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something observable that happened during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// The orchestrator created an actor at a ring point.
    EntitySpawned {
        entity_id: u64,
        class: EntityClass,
        point_index: usize,
        position: DVec3,
    },
    /// An actor was admitted through the public registration call.
    EntityRegistered {
        entity_id: u64,
        class: EntityClass,
        position: DVec3,
    },
    /// A spawn attempt was skipped.
    SpawnRejected {
        class: Option<EntityClass>,
        reason: RejectReason,
    },
    /// An actor wrapped to the antipodal side of the stage.
    EntityRespawned {
        entity_id: u64,
        class: EntityClass,
        from: DVec3,
        to: DVec3,
    },
    /// An actor left the simulation for good.
    EntityRemoved {
        entity_id: u64,
        class: EntityClass,
        cause: RemovalCause,
    },
    /// An actor's lifecycle machine changed state.
    LifecycleChanged {
        entity_id: u64,
        from: Option<LifecycleState>,
        to: LifecycleState,
    },
    /// A spawn point changed state.
    SpawnPointChanged {
        index: usize,
        from: SpawnPointState,
        to: SpawnPointState,
    },
    /// The wind picked new targets.
    WindRerolled { direction: f64, intensity: f64 },
    /// The defensive sweep found handles whose actor no longer exists.
    StaleHandlesSwept { count: usize },
}
