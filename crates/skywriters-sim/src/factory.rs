//! Actor creation and destruction hooks.
//!
//! The engine never spawns or despawns stage actors itself; it goes through
//! an [`EntityFactory`] so embedders can attach their own components.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skywriters_core::components::{Position, StageEntity, Tint};
use skywriters_core::config::{EntityPreset, StageConfig};
use skywriters_core::enums::EntityClass;
use skywriters_core::types::Color;
use skywriters_core::weighted::{select_random, WeightedEntry};

use crate::error::FactoryError;
use crate::lifecycle::Lifecycle;

pub trait EntityFactory {
    /// Spawn an actor of `class` at `position`. The returned entity must
    /// carry [`Position`], [`StageEntity`] and [`Lifecycle`].
    fn create(
        &mut self,
        world: &mut World,
        class: EntityClass,
        position: DVec3,
        now: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Entity, FactoryError>;

    fn destroy(&mut self, world: &mut World, entity: Entity);
}

/// Builds actors from per-class presets. Clouds get a palette colour.
#[derive(Debug, Clone)]
pub struct PresetFactory {
    presets: Vec<EntityPreset>,
    palette: Vec<WeightedEntry<Color>>,
}

impl PresetFactory {
    pub fn new(presets: Vec<EntityPreset>, palette: Vec<WeightedEntry<Color>>) -> Self {
        Self { presets, palette }
    }

    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(
            EntityClass::ALL.iter().map(|c| config.preset(*c)).collect(),
            config.palette.clone(),
        )
    }

    pub fn preset(&self, class: EntityClass) -> EntityPreset {
        self.presets
            .iter()
            .find(|p| p.class == class)
            .copied()
            .unwrap_or_else(|| EntityPreset::builtin(class))
    }
}

impl EntityFactory for PresetFactory {
    fn create(
        &mut self,
        world: &mut World,
        class: EntityClass,
        position: DVec3,
        now: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Entity, FactoryError> {
        if !position.is_finite() {
            return Err(FactoryError::NonFinitePosition {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }

        let preset = self.preset(class);
        let stage_entity = StageEntity {
            class,
            respawn_on_exit: preset.respawn_on_exit,
            lifespan_secs: preset.lifespan_secs,
            spawned_at: now,
            respawn_count: 0,
        };

        let entity = match class {
            EntityClass::Cloud => {
                // Empty or all-zero palette falls back to white.
                let color = select_random(&self.palette, rng)
                    .copied()
                    .unwrap_or(Color::WHITE);
                world.spawn((
                    Position(position),
                    stage_entity,
                    Lifecycle::new(),
                    Tint(color),
                ))
            }
            EntityClass::Plane | EntityClass::Blimp => {
                world.spawn((Position(position), stage_entity, Lifecycle::new()))
            }
        };
        Ok(entity)
    }

    fn destroy(&mut self, world: &mut World, entity: Entity) {
        let _ = world.despawn(entity);
    }
}
