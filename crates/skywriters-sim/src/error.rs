//! Transient failures raised while admitting actors.
//!
//! None of these are fatal. The orchestrator counts and logs them and moves
//! on to the next attempt.

use thiserror::Error;

use skywriters_core::enums::{EntityClass, RejectReason};

/// Failure reported by an [`EntityFactory`](crate::factory::EntityFactory).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactoryError {
    #[error("spawn position ({x}, {y}, {z}) is not finite")]
    NonFinitePosition { x: f64, y: f64, z: f64 },
    #[error("factory refused to create {class:?}: {reason}")]
    Refused { class: EntityClass, reason: String },
}

/// Why an actor could not be admitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    #[error("no spawn point is available")]
    NoAvailablePoint,
    #[error("spawn weight pool is empty")]
    EmptyWeightPool,
    #[error("{0:?} collection is at capacity")]
    CollectionFull(EntityClass),
    #[error("factory failed for {class:?}: {source}")]
    Factory {
        class: EntityClass,
        #[source]
        source: FactoryError,
    },
}

impl AdmissionError {
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::NoAvailablePoint => RejectReason::NoAvailablePoint,
            Self::EmptyWeightPool => RejectReason::EmptyWeightPool,
            Self::CollectionFull(_) => RejectReason::CollectionFull,
            Self::Factory { .. } => RejectReason::FactoryFailed,
        }
    }

    /// The class involved, when one had been chosen.
    pub fn class(&self) -> Option<EntityClass> {
        match self {
            Self::CollectionFull(class) | Self::Factory { class, .. } => Some(*class),
            Self::NoAvailablePoint | Self::EmptyWeightPool => None,
        }
    }
}
