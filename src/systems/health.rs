use bevy_ecs::prelude::*;
use bevy_utils::tracing::debug;

use crate::components::health::Health;
use crate::components::world::EntityId;
use crate::core::registry::HealthRegistry;
use crate::core::world::{ActionIntent, ActionQueue};

/// Resource capturing the most recent tick's entries.
#[derive(Resource, Default, Debug)]
pub struct HealthEventLog(pub Vec<String>);

/// System: applies the queued tracker intents in order and records them.
pub fn health_intent_system(
    intents: Res<ActionQueue>,
    mut log: ResMut<HealthEventLog>,
    mut registry: ResMut<HealthRegistry>,
    mut commands: Commands,
    mut trackers: Query<(Entity, &EntityId, &mut Health)>,
) {
    log.0.clear();

    for intent in intents.0.iter() {
        let target = intent.target();
        let Some((entity, _, mut tracker)) =
            trackers.iter_mut().find(|(_, id, _)| id.0 == target)
        else {
            log.0.push(format!("Entity {} has no tracker.", target));
            continue;
        };

        match intent {
            ActionIntent::Damage { amount, .. } => {
                if *amount <= 0.0 {
                    log.0
                        .push(format!("Entity {} ignores non-positive damage.", target));
                    continue;
                }
                let died = tracker.damage(*amount);
                if died {
                    log.0
                        .push(format!("Entity {} takes {:.1} damage and dies.", target, amount));
                    deactivate_on_death(target, entity, &tracker, &mut registry, &mut log.0);
                } else {
                    log.0.push(format!(
                        "Entity {} takes {:.1} damage ({:.1} / {:.1}).",
                        target,
                        amount,
                        tracker.health(),
                        tracker.max_health
                    ));
                }
            }
            ActionIntent::SetHealth { value, .. } => {
                let was_dead = tracker.is_dead();
                tracker.set_health(*value);
                if was_dead && tracker.is_alive() {
                    log.0.push(format!(
                        "Entity {} is revived at {:.1} health.",
                        target,
                        tracker.health()
                    ));
                } else if !was_dead && tracker.is_dead() {
                    log.0.push(format!("Entity {} is set to zero health and dies.", target));
                    deactivate_on_death(target, entity, &tracker, &mut registry, &mut log.0);
                } else {
                    log.0.push(format!(
                        "Entity {} health set to {:.1}.",
                        target,
                        tracker.health()
                    ));
                }
            }
            ActionIntent::Kill { .. } => {
                let was_alive = tracker.is_alive();
                tracker.kill();
                if was_alive {
                    log.0.push(format!("Entity {} is killed.", target));
                    deactivate_on_death(target, entity, &tracker, &mut registry, &mut log.0);
                } else {
                    log.0.push(format!("Entity {} is already dead.", target));
                }
            }
            ActionIntent::Resurrect { .. } => {
                let was_dead = tracker.is_dead();
                tracker.resurrect();
                if was_dead {
                    log.0.push(format!(
                        "Entity {} is resurrected ({:.1} health).",
                        target,
                        tracker.health()
                    ));
                } else {
                    log.0
                        .push(format!("Entity {} is restored to full health.", target));
                }
            }
            ActionIntent::Activate { .. } => {
                if registry.insert(entity) {
                    if tracker.reset_on_enable {
                        let max = tracker.max_health;
                        // reset routes through set_health, so enabling a dead
                        // tracker revives it
                        tracker.set_health(max);
                    }
                    debug!(entity_id = target, "tracker activated");
                    log.0.push(format!("Entity {} is activated.", target));
                } else {
                    log.0.push(format!("Entity {} is already active.", target));
                }
            }
            ActionIntent::Deactivate { .. } => {
                if registry.remove(entity) {
                    debug!(entity_id = target, "tracker deactivated");
                    log.0.push(format!("Entity {} is deactivated.", target));
                } else {
                    log.0.push(format!("Entity {} is already inactive.", target));
                }
            }
            ActionIntent::Destroy { .. } => {
                tracker.notify_destroyed();
                registry.remove(entity);
                commands.entity(entity).despawn();
                debug!(entity_id = target, "tracker destroyed");
                log.0.push(format!("Entity {} is destroyed.", target));
            }
        }
    }
}

fn deactivate_on_death(
    target: u32,
    entity: Entity,
    tracker: &Health,
    registry: &mut HealthRegistry,
    log: &mut Vec<String>,
) {
    if tracker.deactivate_on_death && registry.remove(entity) {
        debug!(entity_id = target, "tracker deactivated on death");
        log.push(format!("Entity {} is deactivated on death.", target));
    }
}
