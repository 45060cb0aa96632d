//! Simulation engine: the root of the stage.
//!
//! `SimulationEngine` owns the hecs ECS world, the spawn ring, the wind, the
//! registry and the orchestrator, processes control commands, runs every
//! system in a fixed order and produces `StageSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use skywriters_core::commands::StageCommand;
use skywriters_core::components::Position;
use skywriters_core::config::StageConfig;
use skywriters_core::enums::{EntityClass, LifecycleState, RemovalCause, SpawnPointState};
use skywriters_core::error::ConfigError;
use skywriters_core::events::SimEvent;
use skywriters_core::state::{SpawnStats, StageSnapshot, WindView};
use skywriters_core::types::SimTime;

use crate::error::AdmissionError;
use crate::factory::{EntityFactory, PresetFactory};
use crate::lifecycle::{Lifecycle, LifecycleRules};
use crate::orchestrator::{SpawnContext, SpawnOrchestrator, Spawned};
use crate::regions::StageRegions;
use crate::registry::EntityRegistry;
use crate::ring::RingTopology;
use crate::spawn_point::{PointTransition, SpawnRing};
use crate::systems;
use crate::wind::WindGovernor;

/// The simulation engine. Owns the ECS world and all stage state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: StageConfig,
    ring: SpawnRing,
    wind: WindGovernor,
    regions: StageRegions,
    rules: LifecycleRules,
    registry: EntityRegistry<Entity>,
    orchestrator: SpawnOrchestrator,
    factory: Box<dyn EntityFactory>,
    stats: SpawnStats,
    command_queue: VecDeque<StageCommand>,
    removal_buffer: Vec<(Entity, RemovalCause)>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Validate `config` and build an engine using the preset factory.
    pub fn new(config: StageConfig) -> Result<Self, ConfigError> {
        let factory = PresetFactory::from_config(&config);
        Self::with_factory(config, factory)
    }

    /// Validate `config` and build an engine around a custom factory.
    pub fn with_factory(
        config: StageConfig,
        factory: impl EntityFactory + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let topology = RingTopology::build(
            config.stage.center,
            config.ring_radius(),
            config.ring.point_count,
        )?;
        let ring = SpawnRing::new(
            topology,
            config.ring.initial_state,
            config.ring.revert_delay_secs,
            0.0,
        );
        let registry = EntityRegistry::from_config(&config)?;
        info!(
            seed = config.seed,
            points = ring.len(),
            stage_radius = config.stage.stage_radius,
            spawn_radius = config.stage.spawn_radius,
            "stage initialised"
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ring,
            wind: WindGovernor::new(&config.wind, config.ring.influence_width),
            regions: StageRegions::from_settings(&config.stage),
            rules: LifecycleRules::default(),
            registry,
            orchestrator: SpawnOrchestrator::new(&config.spawn),
            factory: Box::new(factory),
            stats: SpawnStats::default(),
            command_queue: VecDeque::new(),
            removal_buffer: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    /// Queue a command for processing at the next step boundary.
    pub fn queue_command(&mut self, command: StageCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = StageCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting
    /// snapshot.
    pub fn step(&mut self, dt: f64) -> StageSnapshot {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.process_commands();
        self.time.advance(dt);
        self.run_systems(dt);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.wind.view(),
            &self.ring,
            &self.registry,
            &self.stats,
            events,
        )
    }

    /// Admit an actor created outside the orchestrator, e.g. the player's
    /// plane. Subject to the same capacity limits.
    pub fn register_entity(
        &mut self,
        class: EntityClass,
        position: DVec3,
    ) -> Result<Entity, AdmissionError> {
        if self.registry.is_full(class) {
            return Err(AdmissionError::CollectionFull(class));
        }
        let entity = self
            .factory
            .create(
                &mut self.world,
                class,
                position,
                self.time.elapsed_secs,
                &mut self.rng,
            )
            .map_err(|source| AdmissionError::Factory { class, source })?;
        if let Err(err) = self.registry.try_register(class, entity) {
            self.factory.destroy(&mut self.world, entity);
            return Err(err);
        }
        debug!(entity_id = entity.to_bits().get(), class = class.as_str(), "registered");
        self.events.push(SimEvent::EntityRegistered {
            entity_id: entity.to_bits().get(),
            class,
            position,
        });
        Ok(entity)
    }

    /// Remove and destroy an actor. Returns false if it was unknown.
    pub fn unregister_entity(&mut self, entity: Entity) -> bool {
        let removed = systems::cleanup::remove_one(
            &mut self.world,
            &mut self.registry,
            self.factory.as_mut(),
            entity,
        );
        match removed {
            Some(class) => {
                self.stats.removed += 1;
                self.events.push(SimEvent::EntityRemoved {
                    entity_id: entity.to_bits().get(),
                    class,
                    cause: RemovalCause::External,
                });
                true
            }
            None => false,
        }
    }

    /// Move an actor. Returns false if it does not exist.
    pub fn set_entity_position(&mut self, entity: Entity, position: DVec3) -> bool {
        match self.world.get::<&mut Position>(entity) {
            Ok(mut current) => {
                current.0 = position;
                true
            }
            Err(_) => false,
        }
    }

    /// Run one orchestrator attempt immediately, outside the timer.
    pub fn attempt_spawn(&mut self) -> Result<Spawned, AdmissionError> {
        let mut ctx = SpawnContext {
            world: &mut self.world,
            ring: &mut self.ring,
            registry: &mut self.registry,
            factory: self.factory.as_mut(),
            rng: &mut self.rng,
            stats: &mut self.stats,
            events: &mut self.events,
            now: self.time.elapsed_secs,
        };
        self.orchestrator.attempt(&mut ctx)
    }

    /// Force a spawn point into `state`.
    pub fn set_spawn_point_state(&mut self, index: usize, state: SpawnPointState) {
        let transitions = self
            .ring
            .go_to_state(index, state, self.time.elapsed_secs);
        self.push_point_events(&transitions);
    }

    pub fn collection_size(&self, class: EntityClass) -> usize {
        self.registry.collection_size(class)
    }

    pub fn ring_point_states(&self) -> Vec<SpawnPointState> {
        self.ring.states()
    }

    pub fn wind(&self) -> WindView {
        self.wind.view()
    }

    /// Current horizontal wind vector.
    pub fn wind_velocity(&self) -> DVec3 {
        self.wind.velocity()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn stats(&self) -> SpawnStats {
        self.stats
    }

    pub fn lifecycle_state(&self, entity: Entity) -> Option<LifecycleState> {
        self.world
            .get::<&Lifecycle>(entity)
            .ok()
            .map(|lifecycle| lifecycle.state())
    }

    pub fn entity_position(&self, entity: Entity) -> Option<DVec3> {
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn ring(&self) -> &SpawnRing {
        &self.ring
    }

    pub fn registry(&self) -> &EntityRegistry<Entity> {
        &self.registry
    }

    pub fn orchestrator(&self) -> &SpawnOrchestrator {
        &self.orchestrator
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for embedders. Actors despawned directly are
    /// dropped from the registry by the periodic sweep.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: StageCommand) {
        debug!(?command, "command");
        match command {
            StageCommand::PauseSpawning => self.orchestrator.pause(),
            StageCommand::ResumeSpawning => self.orchestrator.resume(),
            StageCommand::PinWind {
                direction,
                intensity,
            } => self.wind.pin(direction, intensity),
            StageCommand::ReleaseWind => self.wind.release(),
            StageCommand::SetSpawnInterval { secs } => self.orchestrator.set_interval(secs),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Wind drift
        if let Some((direction, intensity)) = self.wind.update(dt, &mut self.rng) {
            self.events.push(SimEvent::WindRerolled {
                direction,
                intensity,
            });
        }
        // 2. Ring propagation: wind arcs, then due reverts
        let (_arcs, transitions) = self.wind.apply_to_ring(&mut self.ring, now);
        self.push_point_events(&transitions);
        let transitions = self.ring.advance(now);
        self.push_point_events(&transitions);
        // 3. Lifecycle + lifespan expiry
        systems::lifecycle::run(
            &mut self.world,
            &self.rules,
            &self.regions,
            self.config.stage.center,
            now,
            &mut self.removal_buffer,
            &mut self.events,
            &mut self.stats,
        );
        systems::cleanup::run(
            &mut self.world,
            &mut self.registry,
            self.factory.as_mut(),
            &mut self.removal_buffer,
            &mut self.events,
            &mut self.stats,
        );
        // 4. Registry sweep
        let interval = self.config.registry.sweep_interval_ticks;
        if interval > 0 && self.time.tick % interval == 0 {
            systems::cleanup::sweep(&self.world, &mut self.registry, &mut self.events);
        }
        // 5. Orchestrator
        let mut ctx = SpawnContext {
            world: &mut self.world,
            ring: &mut self.ring,
            registry: &mut self.registry,
            factory: self.factory.as_mut(),
            rng: &mut self.rng,
            stats: &mut self.stats,
            events: &mut self.events,
            now,
        };
        self.orchestrator.update(dt, &mut ctx);
    }

    fn push_point_events(&mut self, transitions: &[PointTransition]) {
        self.events
            .extend(transitions.iter().filter_map(PointTransition::to_event));
    }
}
