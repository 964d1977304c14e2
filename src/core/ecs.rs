use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::core::registry::HealthRegistry;
use crate::core::world::{ActionQueue, IdAllocator};
use crate::systems::health::{health_intent_system, HealthEventLog};

/// Canonical tick ordering for the harness.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Intake,
    Simulation,
    Cleanup,
}

/// Build the ECS world with baseline resources.
pub fn create_world() -> World {
    let mut world = World::new();
    world.insert_resource(ActionQueue::default());
    world.insert_resource(IdAllocator::default());
    world.insert_resource(HealthRegistry::default());
    world.insert_resource(HealthEventLog::default());
    world
}

/// Build the system schedule in the canonical order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((TickSet::Intake, TickSet::Simulation, TickSet::Cleanup).chain());

    schedule.add_systems(health_intent_system.in_set(TickSet::Simulation));

    schedule
}
