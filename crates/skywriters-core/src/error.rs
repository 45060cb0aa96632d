//! Configuration errors.
//!
//! Anything reported here is fatal at initialization: the engine refuses to
//! start rather than silently falling back to a default.

use thiserror::Error;

use crate::enums::EntityClass;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ring must have at least one spawn point")]
    NoRingPoints,

    #[error("stage radius must be positive, got {0}")]
    InvalidStageRadius(f64),

    #[error("spawn radius ({spawn}) must be larger than stage radius ({stage})")]
    SpawnRadiusTooSmall { stage: f64, spawn: f64 },

    #[error("capacity for {0:?} must be at least 1")]
    ZeroCapacity(EntityClass),

    #[error("no capacity configured for {0:?}")]
    MissingCapacity(EntityClass),

    #[error("spawn weight table is empty")]
    MissingSpawnWeights,

    #[error("spawn weight for {class:?} is invalid: {weight}")]
    InvalidWeight { class: EntityClass, weight: f64 },

    #[error("spawn weights sum to zero; nothing could ever spawn")]
    ZeroTotalWeight,

    #[error("palette weight for colour #{index} is invalid: {weight}")]
    InvalidPaletteWeight { index: usize, weight: f64 },

    #[error("spawn tick interval must be within {min}..={max} seconds, got {value}")]
    TickIntervalOutOfRange { value: f64, min: f64, max: f64 },

    #[error("spawn point revert delay must be non-negative, got {0}")]
    NegativeRevertDelay(f64),

    #[error("wind intensity bounds are invalid: min {min}, max {max}")]
    InvalidWindBounds { min: f64, max: f64 },

    #[error("wind re-roll interval must be positive, got {0}")]
    InvalidWindInterval(f64),

    #[error("lifespan for {class:?} must be positive, got {value}")]
    InvalidLifespan { class: EntityClass, value: f64 },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
