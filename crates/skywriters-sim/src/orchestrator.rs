//! Periodic spawn attempts gated by point availability and class capacity.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use skywriters_core::config::SpawnSettings;
use skywriters_core::constants::{SPAWN_TICK_INTERVAL_MAX, SPAWN_TICK_INTERVAL_MIN};
use skywriters_core::enums::{EntityClass, SpawnPointState};
use skywriters_core::events::SimEvent;
use skywriters_core::state::SpawnStats;
use skywriters_core::weighted::{select_random, WeightedEntry};

use crate::error::AdmissionError;
use crate::factory::EntityFactory;
use crate::registry::EntityRegistry;
use crate::spawn_point::{PointTransition, SpawnRing};

/// Mutable simulation state an attempt touches.
pub struct SpawnContext<'a> {
    pub world: &'a mut World,
    pub ring: &'a mut SpawnRing,
    pub registry: &'a mut EntityRegistry<Entity>,
    pub factory: &'a mut dyn EntityFactory,
    pub rng: &'a mut ChaCha8Rng,
    pub stats: &'a mut SpawnStats,
    pub events: &'a mut Vec<SimEvent>,
    pub now: f64,
}

/// A successful spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawned {
    pub entity: Entity,
    pub class: EntityClass,
    pub point_index: usize,
    pub position: DVec3,
}

#[derive(Debug, Clone)]
pub struct SpawnOrchestrator {
    interval: f64,
    /// Seconds accumulated toward the next attempt. Starts below zero by
    /// the warm-up delay so the first attempt lands at `initial_delay`.
    accumulator: f64,
    paused: bool,
    weights: Vec<WeightedEntry<EntityClass>>,
}

impl SpawnOrchestrator {
    pub fn new(settings: &SpawnSettings) -> Self {
        let interval = clamp_interval(settings.tick_interval_secs);
        Self {
            interval,
            accumulator: interval - settings.initial_delay_secs.max(0.0),
            paused: false,
            weights: settings.weights.clone(),
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Clamped to the supported 1..=10 second range.
    pub fn set_interval(&mut self, secs: f64) {
        self.interval = clamp_interval(secs);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn weights(&self) -> &[WeightedEntry<EntityClass>] {
        &self.weights
    }

    /// Accumulate `dt` and run one attempt per elapsed interval.
    /// Returns how many attempts ran.
    pub fn update(&mut self, dt: f64, ctx: &mut SpawnContext<'_>) -> usize {
        if self.paused {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let mut attempts = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            let _ = self.attempt(ctx);
            attempts += 1;
        }
        attempts
    }

    /// One spawn attempt. Rejections are counted, logged and emitted as
    /// events before being returned.
    pub fn attempt(&mut self, ctx: &mut SpawnContext<'_>) -> Result<Spawned, AdmissionError> {
        ctx.stats.attempts += 1;
        match self.try_spawn(ctx) {
            Ok(spawned) => {
                ctx.stats.spawned += 1;
                info!(
                    class = spawned.class.as_str(),
                    point = spawned.point_index,
                    "spawned"
                );
                ctx.events.push(SimEvent::EntitySpawned {
                    entity_id: spawned.entity.to_bits().get(),
                    class: spawned.class,
                    point_index: spawned.point_index,
                    position: spawned.position,
                });
                Ok(spawned)
            }
            Err(err) => {
                match &err {
                    AdmissionError::CollectionFull(_) => info!(%err, "spawn skipped"),
                    AdmissionError::Factory { .. } => warn!(%err, "spawn failed"),
                    AdmissionError::NoAvailablePoint | AdmissionError::EmptyWeightPool => {
                        debug!(%err, "spawn skipped")
                    }
                }
                ctx.stats.record_rejection(err.reason());
                ctx.events.push(SimEvent::SpawnRejected {
                    class: err.class(),
                    reason: err.reason(),
                });
                Err(err)
            }
        }
    }

    fn try_spawn(&self, ctx: &mut SpawnContext<'_>) -> Result<Spawned, AdmissionError> {
        let point_index = ctx
            .ring
            .random_in_state(SpawnPointState::Available, &mut *ctx.rng)
            .ok_or(AdmissionError::NoAvailablePoint)?;
        let class = *select_random(&self.weights, &mut *ctx.rng)
            .ok_or(AdmissionError::EmptyWeightPool)?;
        if ctx.registry.is_full(class) {
            return Err(AdmissionError::CollectionFull(class));
        }

        let position = ctx.ring.position(point_index);
        let entity = ctx
            .factory
            .create(ctx.world, class, position, ctx.now, ctx.rng)
            .map_err(|source| AdmissionError::Factory { class, source })?;
        if let Err(err) = ctx.registry.try_register(class, entity) {
            ctx.factory.destroy(ctx.world, entity);
            return Err(err);
        }

        let transitions = ctx
            .ring
            .go_to_state(point_index, SpawnPointState::Spawning, ctx.now);
        ctx.events
            .extend(transitions.iter().filter_map(PointTransition::to_event));

        Ok(Spawned {
            entity,
            class,
            point_index,
            position,
        })
    }
}

fn clamp_interval(secs: f64) -> f64 {
    if secs.is_finite() {
        secs.clamp(SPAWN_TICK_INTERVAL_MIN, SPAWN_TICK_INTERVAL_MAX)
    } else {
        SPAWN_TICK_INTERVAL_MAX
    }
}
