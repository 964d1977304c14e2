pub mod ecs;
pub mod registry;
pub mod serialization;
pub mod signals;
pub mod world;
