//! Cleanup system: removes departed actors and reconciles the registry with
//! the world.

use hecs::{Entity, World};
use tracing::info;

use skywriters_core::components::StageEntity;
use skywriters_core::enums::{EntityClass, RemovalCause};
use skywriters_core::events::SimEvent;
use skywriters_core::state::SpawnStats;

use crate::factory::EntityFactory;
use crate::registry::EntityRegistry;

/// Unregister and destroy every actor in `removals`, draining the buffer.
pub fn run(
    world: &mut World,
    registry: &mut EntityRegistry<Entity>,
    factory: &mut dyn EntityFactory,
    removals: &mut Vec<(Entity, RemovalCause)>,
    events: &mut Vec<SimEvent>,
    stats: &mut SpawnStats,
) {
    for (entity, cause) in removals.drain(..) {
        if let Some(class) = remove_one(world, registry, factory, entity) {
            stats.removed += 1;
            info!(entity_id = entity.to_bits().get(), class = class.as_str(), ?cause, "removed");
            events.push(SimEvent::EntityRemoved {
                entity_id: entity.to_bits().get(),
                class,
                cause,
            });
        }
    }
}

/// Unregister and destroy one actor. Returns its class, or `None` if it
/// was neither registered nor alive.
pub fn remove_one(
    world: &mut World,
    registry: &mut EntityRegistry<Entity>,
    factory: &mut dyn EntityFactory,
    entity: Entity,
) -> Option<EntityClass> {
    let registered = registry.unregister(entity);
    let class = registered.or_else(|| {
        world
            .get::<&StageEntity>(entity)
            .ok()
            .map(|stage_entity| stage_entity.class)
    });
    if world.contains(entity) {
        factory.destroy(world, entity);
    }
    class
}

/// Drop registry handles whose entity no longer exists in the world.
pub fn sweep(world: &World, registry: &mut EntityRegistry<Entity>, events: &mut Vec<SimEvent>) {
    let removed = registry.sweep(|entity| world.contains(entity));
    if !removed.is_empty() {
        events.push(SimEvent::StaleHandlesSwept {
            count: removed.len(),
        });
    }
}
