//! Simulation constants and tuning defaults.
//!
//! These are the authoritative defaults used by `StageConfig::default()`.

// --- Stage geometry ---

/// Radius of the playable stage (world units).
pub const STAGE_RADIUS: f64 = 1000.0;

/// Outer radius of the spawn ring band.
pub const SPAWN_RADIUS: f64 = 1100.0;

// --- Ring ---

/// Default number of spawn points on the ring.
pub const RING_POINT_COUNT: usize = 16;

/// Hard ceiling on ring points, bounding neighbour search cost.
pub const MAX_RING_POINTS: usize = 32;

/// Number of ring steps affected on each side of the wind entry/exit point.
pub const WIND_INFLUENCE_WIDTH: usize = 2;

// --- Spawn points ---

/// Seconds a spawn point stays in Spawning before reverting to Available.
pub const SPAWN_POINT_REVERT_SECS: f64 = 3.0;

// --- Orchestrator ---

/// Seconds between spawn attempts.
pub const SPAWN_TICK_INTERVAL_SECS: f64 = 2.0;

/// Allowed range for the spawn tick interval.
pub const SPAWN_TICK_INTERVAL_MIN: f64 = 1.0;
pub const SPAWN_TICK_INTERVAL_MAX: f64 = 10.0;

/// Delay before the first spawn attempt.
pub const SPAWN_INITIAL_DELAY_SECS: f64 = 1.0;

// --- Lifecycle ---

/// Grace period between leaving the spawn ring and entering Game.
pub const SPAWN_GRACE_SECS: f64 = 1.0;

// --- Registry ---

pub const PLANE_CAPACITY: usize = 8;
pub const CLOUD_CAPACITY: usize = 256;
pub const BLIMP_CAPACITY: usize = 2;

/// Steps between defensive registry sweeps.
pub const REGISTRY_SWEEP_INTERVAL_TICKS: u64 = 30;

// --- Wind ---

/// Initial wind direction (degrees).
pub const WIND_DIRECTION: f64 = 0.0;

/// Initial wind intensity.
pub const WIND_INTENSITY: f64 = 10.0;

/// Seconds between new randomized wind targets.
pub const WIND_REROLL_SECS: f64 = 30.0;

/// Bounds for randomized wind intensity.
pub const WIND_INTENSITY_MIN: f64 = 0.0;
pub const WIND_INTENSITY_MAX: f64 = 50.0;

/// Fraction of the remaining gap closed per second while interpolating.
pub const WIND_SMOOTHING_PER_SEC: f64 = 0.1;

// --- Engine ---

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default fixed step used by the runner (seconds).
pub const DEFAULT_DT: f64 = 1.0 / 30.0;
