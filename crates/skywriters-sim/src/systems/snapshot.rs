//! Snapshot system: queries the ECS world and builds a complete StageSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use skywriters_core::components::{Position, StageEntity, Tint};
use skywriters_core::enums::EntityClass;
use skywriters_core::events::SimEvent;
use skywriters_core::state::*;
use skywriters_core::types::SimTime;

use crate::lifecycle::Lifecycle;
use crate::registry::EntityRegistry;
use crate::spawn_point::SpawnRing;

/// Build a complete StageSnapshot from the current simulation state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    wind: WindView,
    ring: &SpawnRing,
    registry: &EntityRegistry<Entity>,
    stats: &SpawnStats,
    events: Vec<SimEvent>,
) -> StageSnapshot {
    StageSnapshot {
        time: *time,
        wind,
        ring: build_ring(ring),
        collections: build_collections(registry),
        entities: build_entities(world),
        stats: *stats,
        events,
    }
}

fn build_ring(ring: &SpawnRing) -> Vec<SpawnPointView> {
    ring.points()
        .iter()
        .map(|point| SpawnPointView {
            index: point.index,
            position: point.position,
            state: point.state(),
        })
        .collect()
}

/// One entry per class, including classes with no collection yet.
fn build_collections(registry: &EntityRegistry<Entity>) -> Vec<CollectionView> {
    EntityClass::ALL
        .iter()
        .map(|&class| CollectionView {
            class,
            live: registry.collection_size(class),
            capacity: registry.capacity(class),
        })
        .collect()
}

/// Entity views sorted by entity id.
fn build_entities(world: &World) -> Vec<EntityView> {
    let mut entities: Vec<EntityView> = world
        .query::<(&Position, &StageEntity, Option<&Lifecycle>, Option<&Tint>)>()
        .iter()
        .map(|(entity, (position, stage_entity, lifecycle, tint))| EntityView {
            entity_id: entity.to_bits().get(),
            class: stage_entity.class,
            position: position.0,
            state: lifecycle.map(Lifecycle::state),
            tint: tint.map(|t| t.0),
        })
        .collect();
    entities.sort_by_key(|e| e.entity_id);
    entities
}
