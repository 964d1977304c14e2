use std::fs;
use std::path::Path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::health::{Health, HealthConfig};
use crate::components::world::EntityId;
use crate::core::registry::HealthRegistry;
use crate::core::world::IdAllocator;

/// Save state capturing every tracker plus registry membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default = "default_save_version")]
    pub version: u32,
    pub trackers: Vec<SavedTracker>,
}

fn default_save_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracker {
    pub uid: u32,
    pub max_health: f32,
    pub damage_multiplier: f32,
    pub reset_on_enable: bool,
    pub deactivate_on_death: bool,
    pub current: f32,
    pub active: bool,
}

/// Extract a serializable snapshot of the world.
///
/// Active trackers come first, in activation order, so registry order
/// survives a round trip; inactive trackers follow.
pub fn extract_state_from_world(world: &mut World) -> SaveState {
    let active: Vec<Entity> = world.resource::<HealthRegistry>().iter().collect();

    let mut query = world.query::<(Entity, &EntityId, &Health)>();
    let mut all: Vec<(Entity, SavedTracker)> = query
        .iter(world)
        .map(|(entity, id, tracker)| {
            (
                entity,
                SavedTracker {
                    uid: id.0,
                    max_health: tracker.max_health,
                    damage_multiplier: tracker.damage_multiplier,
                    reset_on_enable: tracker.reset_on_enable,
                    deactivate_on_death: tracker.deactivate_on_death,
                    current: tracker.health(),
                    active: false,
                },
            )
        })
        .collect();

    let mut trackers = Vec::with_capacity(all.len());
    for entity in &active {
        if let Some(pos) = all.iter().position(|(other, _)| other == entity) {
            let (_, mut saved) = all.remove(pos);
            saved.active = true;
            trackers.push(saved);
        }
    }
    trackers.extend(all.into_iter().map(|(_, saved)| saved));

    SaveState {
        version: 1,
        trackers,
    }
}

/// Apply a saved state back into a live world, replacing existing trackers.
pub fn apply_state_to_world(state: SaveState, world: &mut World) {
    let mut query = world.query_filtered::<Entity, With<Health>>();
    let existing: Vec<Entity> = query.iter(world).collect();
    for entity in existing {
        world.despawn(entity);
    }
    world.resource_mut::<HealthRegistry>().clear();

    let mut max_uid = 0;
    for saved in &state.trackers {
        let mut tracker = Health::from(HealthConfig {
            max_health: saved.max_health,
            damage_multiplier: saved.damage_multiplier,
            reset_on_enable: saved.reset_on_enable,
            deactivate_on_death: saved.deactivate_on_death,
        });
        // the fresh tracker has no listeners yet; nothing observes this set
        tracker.set_health(saved.current);

        let entity = world.spawn((EntityId(saved.uid), tracker)).id();
        if saved.active {
            world.resource_mut::<HealthRegistry>().insert(entity);
        }
        max_uid = max_uid.max(saved.uid);
    }

    world
        .resource_mut::<IdAllocator>()
        .bump_to_at_least(max_uid + 1);
}

/// Serialize a save state to pretty JSON.
pub fn save_state_to_json(state: &SaveState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}

/// Parse a save state from JSON.
pub fn load_state_from_json(data: &str) -> Result<SaveState, serde_json::Error> {
    serde_json::from_str(data)
}

/// Write a save state to a file path.
pub fn save_state_to_path<P: AsRef<Path>>(state: &SaveState, path: P) -> std::io::Result<()> {
    let json = save_state_to_json(state)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Read a save state from a file path.
pub fn load_state_from_path<P: AsRef<Path>>(path: P) -> std::io::Result<SaveState> {
    let data = fs::read_to_string(&path)?;
    load_state_from_json(&data).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}
