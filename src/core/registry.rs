use bevy_ecs::prelude::*;

/// Ordered set of the trackers that are currently activated.
///
/// Membership changes only through activation and deactivation; the registry
/// owns nothing. External systems iterate it for bulk work ("damage every
/// tracker in the blast radius").
#[derive(Resource, Debug, Default)]
pub struct HealthRegistry {
    entries: Vec<Entity>,
}

impl HealthRegistry {
    /// Returns false when the entity is already registered.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.entries.push(entity);
        true
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != entity);
        self.entries.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.iter().any(|entry| *entry == entity)
    }

    /// Active entities in activation order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
