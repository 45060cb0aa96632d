//! Lifecycle system: steps every actor's lifecycle machine and collects the
//! actors that must leave the simulation.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use skywriters_core::components::{Position, StageEntity};
use skywriters_core::enums::RemovalCause;
use skywriters_core::events::SimEvent;
use skywriters_core::state::SpawnStats;

use crate::lifecycle::{EntityCtx, Lifecycle, LifecycleOutcome, LifecycleRules};
use crate::regions::RegionTest;

/// Step every actor once at time `now`.
///
/// Respawns are applied in place. Actors whose lifespan ran out or that
/// despawned without respawning are pushed onto `removals` for the cleanup
/// system.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rules: &LifecycleRules,
    regions: &dyn RegionTest,
    center: DVec3,
    now: f64,
    removals: &mut Vec<(Entity, RemovalCause)>,
    events: &mut Vec<SimEvent>,
    stats: &mut SpawnStats,
) {
    for (entity, (position, stage_entity, lifecycle)) in
        world.query_mut::<(&mut Position, &mut StageEntity, &mut Lifecycle)>()
    {
        let entity_id = entity.to_bits().get();

        if stage_entity.is_expired(now) {
            debug!(entity_id, class = stage_entity.class.as_str(), "lifespan expired");
            removals.push((entity, RemovalCause::LifespanExpired));
            continue;
        }

        let mut ctx = EntityCtx::new(
            position.0,
            stage_entity.respawn_on_exit,
            center,
            regions,
        );
        let changes = lifecycle.step(rules, &mut ctx, now);
        position.0 = ctx.position;

        events.extend(changes.iter().map(|change| SimEvent::LifecycleChanged {
            entity_id,
            from: change.from,
            to: change.to,
        }));

        match ctx.outcome {
            Some(LifecycleOutcome::Respawned { from, to }) => {
                stage_entity.respawn_count += 1;
                stats.respawned += 1;
                info!(
                    entity_id,
                    class = stage_entity.class.as_str(),
                    respawns = stage_entity.respawn_count,
                    "wrapped to antipode"
                );
                events.push(SimEvent::EntityRespawned {
                    entity_id,
                    class: stage_entity.class,
                    from,
                    to,
                });
            }
            Some(LifecycleOutcome::Destroy) => {
                removals.push((entity, RemovalCause::ExitedStage));
            }
            None => {}
        }
    }
}
