use std::path::Path;

use bevy_ecs::prelude::*;

use crate::components::health::{Health, HealthConfig, HealthSignals};
use crate::components::world::EntityId;
use crate::core::ecs::{create_schedule, create_world};
use crate::core::registry::HealthRegistry;
use crate::core::serialization::{
    apply_state_to_world, extract_state_from_world, load_state_from_path, save_state_to_path,
    SaveState,
};
use crate::systems::health::HealthEventLog;

/// Intent-driven commands fed into the ECS each tick.
#[derive(Debug, Clone)]
pub enum ActionIntent {
    Damage { entity_id: u32, amount: f32 },
    SetHealth { entity_id: u32, value: f32 },
    Kill { entity_id: u32 },
    Resurrect { entity_id: u32 },
    Activate { entity_id: u32 },
    Deactivate { entity_id: u32 },
    Destroy { entity_id: u32 },
}

impl ActionIntent {
    /// The entity the intent addresses.
    pub fn target(&self) -> u32 {
        match self {
            ActionIntent::Damage { entity_id, .. }
            | ActionIntent::SetHealth { entity_id, .. }
            | ActionIntent::Kill { entity_id }
            | ActionIntent::Resurrect { entity_id }
            | ActionIntent::Activate { entity_id }
            | ActionIntent::Deactivate { entity_id }
            | ActionIntent::Destroy { entity_id } => *entity_id,
        }
    }
}

/// Resource storing the intents for the next tick.
#[derive(Resource, Default, Debug)]
pub struct ActionQueue(pub Vec<ActionIntent>);

/// Monotonic allocator for stable entity ids.
#[derive(Resource, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn alloc(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn bump_to_at_least(&mut self, min_next: u32) {
        if self.next < min_next {
            self.next = min_next;
        }
    }
}

/// Data snapshot returned to the caller after each tick.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub active: Vec<TrackerSummary>,
    pub events: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TrackerSummary {
    pub id: u32,
    pub health: f32,
    pub max_health: f32,
    pub normalized: f32,
    pub alive: bool,
}

/// Wrapper around the ECS world and schedule, standing in for the engine's
/// update loop.
pub struct Game {
    world: World,
    schedule: Schedule,
}

impl Game {
    pub fn new() -> Self {
        Self {
            world: create_world(),
            schedule: create_schedule(),
        }
    }

    /// Spawn a tracker from config and activate it, like an engine object
    /// entering the scene enabled.
    pub fn spawn_tracker(&mut self, config: HealthConfig) -> u32 {
        let uid = allocate_entity_id(&mut self.world);
        let entity = self
            .world
            .spawn((EntityId(uid), Health::from(config)))
            .id();
        self.world.resource_mut::<HealthRegistry>().insert(entity);
        uid
    }

    /// Run one tick with the provided intents and return a snapshot.
    pub fn tick(&mut self, intents: Vec<ActionIntent>) -> Snapshot {
        {
            let mut queue = self.world.resource_mut::<ActionQueue>();
            queue.0 = intents;
        }

        self.schedule.run(&mut self.world);
        Snapshot::capture(&self.world)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world)
    }

    /// Borrow a tracker for inspection.
    pub fn tracker(&mut self, entity_id: u32) -> Option<&Health> {
        let entity = self.find_entity(entity_id)?;
        self.world.get::<Health>(entity)
    }

    /// Borrow a tracker mutably, e.g. to drive its operations directly.
    pub fn tracker_mut(&mut self, entity_id: u32) -> Option<&mut Health> {
        let entity = self.find_entity(entity_id)?;
        self.world.get_mut::<Health>(entity).map(Mut::into_inner)
    }

    /// Subscription surface for a tracker's notification channels.
    pub fn signals_mut(&mut self, entity_id: u32) -> Option<&mut HealthSignals> {
        self.tracker_mut(entity_id).map(Health::signals_mut)
    }

    pub fn health(&mut self, entity_id: u32) -> Option<f32> {
        self.tracker(entity_id).map(Health::health)
    }

    pub fn is_alive(&mut self, entity_id: u32) -> Option<bool> {
        self.tracker(entity_id).map(Health::is_alive)
    }

    /// Ids of the currently activated trackers, in activation order.
    pub fn active_ids(&self) -> Vec<u32> {
        let entities: Vec<Entity> = self.world.resource::<HealthRegistry>().iter().collect();
        entities
            .into_iter()
            .filter_map(|entity| self.world.get::<EntityId>(entity))
            .map(|id| id.0)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.world.resource::<HealthRegistry>().len()
    }

    /// Extract a serializable save state from the current world.
    pub fn save_state(&mut self) -> SaveState {
        extract_state_from_world(&mut self.world)
    }

    /// Apply a saved state back into the live world.
    pub fn load_state(&mut self, state: SaveState) {
        apply_state_to_world(state, &mut self.world);
    }

    /// Save state directly to a file path.
    pub fn save_to_path<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        save_state_to_path(&self.save_state(), path)
    }

    /// Load state directly from a file path.
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let state = load_state_from_path(path)?;
        self.load_state(state);
        Ok(())
    }

    fn find_entity(&mut self, entity_id: u32) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &EntityId)>();
        query
            .iter(&self.world)
            .find(|(_, id)| id.0 == entity_id)
            .map(|(entity, _)| entity)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate_entity_id(world: &mut World) -> u32 {
    let mut alloc = world.resource_mut::<IdAllocator>();
    alloc.alloc()
}

impl Snapshot {
    fn capture(world: &World) -> Self {
        let entities: Vec<Entity> = world.resource::<HealthRegistry>().iter().collect();
        let active = entities
            .into_iter()
            .filter_map(|entity| {
                let id = world.get::<EntityId>(entity)?.0;
                let tracker = world.get::<Health>(entity)?;
                Some(TrackerSummary {
                    id,
                    health: tracker.health(),
                    max_health: tracker.max_health,
                    normalized: tracker.health_normalized(),
                    alive: tracker.is_alive(),
                })
            })
            .collect();

        let events = world.resource::<HealthEventLog>().0.clone();

        Self { active, events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn spawned_tracker_is_active_and_full() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig::default());

        assert_eq!(game.active_ids(), vec![id]);
        assert_eq!(game.health(id), Some(100.0));
        assert_eq!(game.is_alive(id), Some(true));
    }

    #[test]
    fn damage_intent_applies_multiplier_and_clamps() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig {
            max_health: 100.0,
            damage_multiplier: 2.0,
            ..HealthConfig::default()
        });

        game.tick(vec![ActionIntent::Damage {
            entity_id: id,
            amount: 10.0,
        }]);
        assert_eq!(game.health(id), Some(80.0));

        game.tick(vec![ActionIntent::Damage {
            entity_id: id,
            amount: 500.0,
        }]);
        assert_eq!(game.health(id), Some(0.0));
        assert_eq!(game.is_alive(id), Some(false));
    }

    #[test]
    fn lethal_damage_with_deactivate_on_death_leaves_registry() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig {
            deactivate_on_death: true,
            ..HealthConfig::default()
        });

        let snapshot = game.tick(vec![ActionIntent::Damage {
            entity_id: id,
            amount: 150.0,
        }]);

        assert!(game.active_ids().is_empty());
        assert_eq!(game.is_alive(id), Some(false));
        assert!(snapshot.active.is_empty());
        // the tracker itself survives deactivation
        assert!(game.tracker(id).is_some());
    }

    #[test]
    fn duplicate_activate_is_a_noop() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig::default());

        game.tick(vec![ActionIntent::Activate { entity_id: id }]);
        assert_eq!(game.active_count(), 1);
    }

    #[test]
    fn reactivation_resets_health() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig::default());

        game.tick(vec![ActionIntent::Damage {
            entity_id: id,
            amount: 40.0,
        }]);
        assert_eq!(game.health(id), Some(60.0));

        game.tick(vec![ActionIntent::Deactivate { entity_id: id }]);
        assert!(game.active_ids().is_empty());

        game.tick(vec![ActionIntent::Activate { entity_id: id }]);
        assert_eq!(game.active_ids(), vec![id]);
        assert_eq!(game.health(id), Some(100.0));
    }

    #[test]
    fn reactivating_dead_tracker_revives_it() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig::default());

        game.tick(vec![
            ActionIntent::Kill { entity_id: id },
            ActionIntent::Deactivate { entity_id: id },
        ]);
        assert_eq!(game.is_alive(id), Some(false));

        let revivals = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&revivals);
        game.signals_mut(id).unwrap().resurrect.subscribe(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        game.tick(vec![ActionIntent::Activate { entity_id: id }]);

        assert_eq!(game.is_alive(id), Some(true));
        assert_eq!(game.health(id), Some(100.0));
        assert_eq!(revivals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn destroy_notifies_and_despawns() {
        let mut game = Game::new();
        let id = game.spawn_tracker(HealthConfig::default());
        let destroyed = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&destroyed);
        game.signals_mut(id).unwrap().destroyed.subscribe(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        game.tick(vec![ActionIntent::Destroy { entity_id: id }]);

        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(game.tracker(id).is_none());
        assert!(game.active_ids().is_empty());
    }

    #[test]
    fn bulk_damage_over_registry() {
        let mut game = Game::new();
        for max_health in [30.0, 40.0, 60.0] {
            game.spawn_tracker(HealthConfig {
                max_health,
                ..HealthConfig::default()
            });
        }

        let volley: Vec<ActionIntent> = game
            .active_ids()
            .into_iter()
            .map(|entity_id| ActionIntent::Damage {
                entity_id,
                amount: 35.0,
            })
            .collect();
        let snapshot = game.tick(volley);

        let healths: Vec<f32> = snapshot.active.iter().map(|t| t.health).collect();
        assert_eq!(healths, vec![0.0, 5.0, 25.0]);
        assert!(!snapshot.events.is_empty());
    }

    #[test]
    fn save_and_load_restores_trackers_and_registry() {
        let mut game = Game::new();
        let first = game.spawn_tracker(HealthConfig::default());
        let second = game.spawn_tracker(HealthConfig {
            max_health: 50.0,
            ..HealthConfig::default()
        });

        game.tick(vec![
            ActionIntent::Damage {
                entity_id: first,
                amount: 30.0,
            },
            ActionIntent::Deactivate { entity_id: second },
        ]);

        let state = game.save_state();

        let mut restored = Game::new();
        restored.load_state(state);

        assert_eq!(restored.health(first), Some(70.0));
        assert_eq!(restored.health(second), Some(50.0));
        assert_eq!(restored.active_ids(), vec![first]);

        // the allocator moves past every restored uid
        let next = restored.spawn_tracker(HealthConfig::default());
        assert!(next > second);
    }
}
