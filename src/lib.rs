// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod core;
pub mod data;
pub mod systems;

// Expose the main Game wrapper and types needed for interaction
pub use crate::components::health::{Health, HealthConfig, HealthSignals, Vitals};
pub use crate::core::registry::HealthRegistry;
pub use crate::core::serialization::SaveState;
pub use crate::core::signals::{ListenerId, Signal};
pub use crate::core::world::{ActionIntent, Game, Snapshot, TrackerSummary};
