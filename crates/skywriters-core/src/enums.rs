//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of stage actor. Used as the registry partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Plane,
    Cloud,
    Blimp,
}

impl EntityClass {
    /// Every class, in registry order.
    pub const ALL: [EntityClass; 3] = [EntityClass::Plane, EntityClass::Cloud, EntityClass::Blimp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plane => "Plane",
            Self::Cloud => "Cloud",
            Self::Blimp => "Blimp",
        }
    }
}

/// Spawn point availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnPointState {
    /// Never offered for spawning.
    Disabled,
    /// Offerable to the orchestrator.
    #[default]
    Available,
    /// Hosting an in-progress creation. Reverts to Available on its own.
    Spawning,
}

/// Per-entity lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Entering the stage from the spawn ring.
    #[default]
    Spawn,
    /// Inside the stage.
    Game,
    /// Left the stage. Either wraps back to Spawn or is destroyed.
    Despawn,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 3] = [
        LifecycleState::Spawn,
        LifecycleState::Game,
        LifecycleState::Despawn,
    ];
}

impl SpawnPointState {
    pub const ALL: [SpawnPointState; 3] = [
        SpawnPointState::Disabled,
        SpawnPointState::Available,
        SpawnPointState::Spawning,
    ];
}

/// Why a spawn attempt did not produce an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    NoAvailablePoint,
    EmptyWeightPool,
    CollectionFull,
    FactoryFailed,
}

/// Why an entity left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Left the stage without `respawn_on_exit`.
    ExitedStage,
    /// Lived longer than its preset lifespan.
    LifespanExpired,
    /// Removed through the public unregister call.
    External,
}
