//! Runtime configuration for a stage simulation.
//!
//! [`StageConfig`] mirrors the defaults in [`crate::constants`] and can be
//! loaded from TOML. Missing keys fall back to those defaults, so a minimal
//! file only needs the values it wants to change. Every config is checked by
//! [`StageConfig::validate`] before an engine is built from it.
//!
//! ```toml
//! seed = 7
//!
//! [ring]
//! point_count = 12
//!
//! [[spawn.weights]]
//! value = "Plane"
//! weight = 1.0
//!
//! [[registry.capacities]]
//! class = "Plane"
//! capacity = 4
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{EntityClass, SpawnPointState};
use crate::error::ConfigError;
use crate::types::Color;
use crate::weighted::{total_weight, WeightedEntry};

/// Complete configuration for one running simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// RNG seed. Same seed and same inputs give the same simulation.
    pub seed: u64,
    pub stage: StageSettings,
    pub ring: RingSettings,
    pub wind: WindSettings,
    pub spawn: SpawnSettings,
    pub registry: RegistrySettings,
    /// Per-class behaviour presets. Classes without an entry use
    /// [`EntityPreset::builtin`].
    pub presets: Vec<EntityPreset>,
    /// Weighted colours assigned to clouds at creation.
    pub palette: Vec<WeightedEntry<Color>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    /// Stage centre. Y is ignored by the topology.
    pub center: DVec3,
    pub stage_radius: f64,
    pub spawn_radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RingSettings {
    /// Requested point count. Clamped to `MAX_RING_POINTS`.
    pub point_count: usize,
    /// Ring steps affected on each side of the wind entry/exit points.
    pub influence_width: usize,
    /// Seconds a point stays in Spawning.
    pub revert_delay_secs: f64,
    /// State every point starts in.
    pub initial_state: SpawnPointState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    /// Initial direction in degrees.
    pub direction: f64,
    pub intensity: f64,
    pub reroll_interval_secs: f64,
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub smoothing_per_sec: f64,
    /// Keep the wind fixed at its initial values.
    pub pinned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub tick_interval_secs: f64,
    pub initial_delay_secs: f64,
    /// Relative odds of each class being chosen on a spawn attempt.
    pub weights: Vec<WeightedEntry<EntityClass>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub capacities: Vec<ClassCapacity>,
    /// Steps between defensive sweeps of stale handles. 0 disables sweeping.
    pub sweep_interval_ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassCapacity {
    pub class: EntityClass,
    pub capacity: usize,
}

/// Behaviour rules applied to every actor of a class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityPreset {
    pub class: EntityClass,
    #[serde(default)]
    pub respawn_on_exit: bool,
    #[serde(default)]
    pub lifespan_secs: Option<f64>,
}

impl EntityPreset {
    /// Built-in rules: planes and blimps wrap around the stage, clouds drift
    /// off and dissipate.
    pub fn builtin(class: EntityClass) -> Self {
        match class {
            EntityClass::Plane => Self {
                class,
                respawn_on_exit: true,
                lifespan_secs: None,
            },
            EntityClass::Cloud => Self {
                class,
                respawn_on_exit: false,
                lifespan_secs: Some(120.0),
            },
            EntityClass::Blimp => Self {
                class,
                respawn_on_exit: true,
                lifespan_secs: None,
            },
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            stage: StageSettings::default(),
            ring: RingSettings::default(),
            wind: WindSettings::default(),
            spawn: SpawnSettings::default(),
            registry: RegistrySettings::default(),
            presets: EntityClass::ALL.iter().map(|c| EntityPreset::builtin(*c)).collect(),
            palette: vec![
                WeightedEntry::new(Color::WHITE, 2.0),
                WeightedEntry::new(Color::RED, 1.0),
                WeightedEntry::new(Color::GREEN, 1.0),
                WeightedEntry::new(Color::BLUE, 1.0),
            ],
        }
    }
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            stage_radius: STAGE_RADIUS,
            spawn_radius: SPAWN_RADIUS,
        }
    }
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            point_count: RING_POINT_COUNT,
            influence_width: WIND_INFLUENCE_WIDTH,
            revert_delay_secs: SPAWN_POINT_REVERT_SECS,
            initial_state: SpawnPointState::Available,
        }
    }
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            direction: WIND_DIRECTION,
            intensity: WIND_INTENSITY,
            reroll_interval_secs: WIND_REROLL_SECS,
            intensity_min: WIND_INTENSITY_MIN,
            intensity_max: WIND_INTENSITY_MAX,
            smoothing_per_sec: WIND_SMOOTHING_PER_SEC,
            pinned: false,
        }
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: SPAWN_TICK_INTERVAL_SECS,
            initial_delay_secs: SPAWN_INITIAL_DELAY_SECS,
            weights: vec![
                WeightedEntry::new(EntityClass::Cloud, 6.0),
                WeightedEntry::new(EntityClass::Plane, 3.0),
                WeightedEntry::new(EntityClass::Blimp, 1.0),
            ],
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            capacities: vec![
                ClassCapacity {
                    class: EntityClass::Plane,
                    capacity: PLANE_CAPACITY,
                },
                ClassCapacity {
                    class: EntityClass::Cloud,
                    capacity: CLOUD_CAPACITY,
                },
                ClassCapacity {
                    class: EntityClass::Blimp,
                    capacity: BLIMP_CAPACITY,
                },
            ],
            sweep_interval_ticks: REGISTRY_SWEEP_INTERVAL_TICKS,
        }
    }
}

impl StageConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject every misconfiguration that would otherwise surface as silent
    /// misbehaviour at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring.point_count == 0 {
            return Err(ConfigError::NoRingPoints);
        }
        if !(self.stage.stage_radius > 0.0) {
            return Err(ConfigError::InvalidStageRadius(self.stage.stage_radius));
        }
        if !(self.stage.spawn_radius > self.stage.stage_radius) {
            return Err(ConfigError::SpawnRadiusTooSmall {
                stage: self.stage.stage_radius,
                spawn: self.stage.spawn_radius,
            });
        }

        self.capacity_map()?;

        if self.spawn.weights.is_empty() {
            return Err(ConfigError::MissingSpawnWeights);
        }
        for entry in &self.spawn.weights {
            if !(entry.weight >= 0.0) || !entry.weight.is_finite() {
                return Err(ConfigError::InvalidWeight {
                    class: entry.value,
                    weight: entry.weight,
                });
            }
        }
        if total_weight(&self.spawn.weights) <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        for (index, entry) in self.palette.iter().enumerate() {
            if !(entry.weight >= 0.0) || !entry.weight.is_finite() {
                return Err(ConfigError::InvalidPaletteWeight {
                    index,
                    weight: entry.weight,
                });
            }
        }

        let interval = self.spawn.tick_interval_secs;
        if !(SPAWN_TICK_INTERVAL_MIN..=SPAWN_TICK_INTERVAL_MAX).contains(&interval) {
            return Err(ConfigError::TickIntervalOutOfRange {
                value: interval,
                min: SPAWN_TICK_INTERVAL_MIN,
                max: SPAWN_TICK_INTERVAL_MAX,
            });
        }
        if !(self.ring.revert_delay_secs >= 0.0) {
            return Err(ConfigError::NegativeRevertDelay(self.ring.revert_delay_secs));
        }

        let wind = &self.wind;
        if !(wind.intensity_min >= 0.0) || !(wind.intensity_max >= wind.intensity_min) {
            return Err(ConfigError::InvalidWindBounds {
                min: wind.intensity_min,
                max: wind.intensity_max,
            });
        }
        if !(wind.reroll_interval_secs > 0.0) {
            return Err(ConfigError::InvalidWindInterval(wind.reroll_interval_secs));
        }

        for preset in &self.presets {
            if let Some(lifespan) = preset.lifespan_secs {
                if !(lifespan > 0.0) {
                    return Err(ConfigError::InvalidLifespan {
                        class: preset.class,
                        value: lifespan,
                    });
                }
            }
        }

        Ok(())
    }

    /// Capacities keyed by class. Every class must be present and non-zero.
    pub fn capacity_map(&self) -> Result<BTreeMap<EntityClass, usize>, ConfigError> {
        let map: BTreeMap<EntityClass, usize> = self
            .registry
            .capacities
            .iter()
            .map(|c| (c.class, c.capacity))
            .collect();
        for class in EntityClass::ALL {
            match map.get(&class) {
                None => return Err(ConfigError::MissingCapacity(class)),
                Some(0) => return Err(ConfigError::ZeroCapacity(class)),
                Some(_) => {}
            }
        }
        Ok(map)
    }

    /// Preset for a class, falling back to the built-in rules.
    pub fn preset(&self, class: EntityClass) -> EntityPreset {
        self.presets
            .iter()
            .find(|p| p.class == class)
            .copied()
            .unwrap_or_else(|| EntityPreset::builtin(class))
    }

    /// Radius the spawn ring is built on: the middle of the spawn band.
    pub fn ring_radius(&self) -> f64 {
        (self.stage.stage_radius + self.stage.spawn_radius) * 0.5
    }

    /// Point count after clamping to the supported maximum.
    pub fn clamped_point_count(&self) -> usize {
        self.ring.point_count.min(MAX_RING_POINTS)
    }
}
