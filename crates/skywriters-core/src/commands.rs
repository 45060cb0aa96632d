//! Control commands sent to the simulation from its environment.
//!
//! Commands are queued and processed at the next step boundary.

use serde::{Deserialize, Serialize};

/// All external control actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StageCommand {
    /// Stop the orchestrator from attempting spawns.
    PauseSpawning,
    /// Resume spawn attempts.
    ResumeSpawning,
    /// Pin the wind to a fixed direction (degrees) and intensity.
    PinWind { direction: f64, intensity: f64 },
    /// Let the wind drift toward randomized targets again.
    ReleaseWind,
    /// Change the orchestrator cadence. Clamped to 1..=10 seconds.
    SetSpawnInterval { secs: f64 },
}
