//! RPG stat components and the system that feeds them into gameplay
//!
//! `Stats` is the designer-authored source of truth; `Movement` is what
//! the rest of the engine actually reads. The stat sync system copies
//! derived values across once per tick.

use crate::core::entity::World;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// RPG-style stats authored by designers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Base movement speed in pixels per second
    pub move_speed: f32,
    /// Multiplier applied to move_speed while sprinting
    pub sprint_multiplier: f32,
    /// Maximum health points
    pub max_health: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            move_speed: 160.0,
            sprint_multiplier: 1.5,
            max_health: 100.0,
        }
    }
}

/// Movement parameters consumed by locomotion code
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Current walk speed in pixels per second
    pub speed: f32,
    /// Current sprint speed in pixels per second
    pub sprint_speed: f32,
}

/// Copy derived stat values into Movement for every entity with both components
///
/// Entities lacking either component are skipped entirely.
pub fn stat_sync_system(world: &mut World) {
    let mut synced = 0usize;
    for (_, (stats, movement)) in world.query_mut::<(&Stats, &mut Movement)>() {
        movement.speed = stats.move_speed;
        movement.sprint_speed = stats.move_speed * stats.sprint_multiplier;
        synced += 1;
    }
    trace!(count = synced, "Synced stats into movement components");
}
