use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Stable identifier for addressing entities externally.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId(pub u32);
