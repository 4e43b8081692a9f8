//! Core components for the entity system

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Transform component holding the position and rotation of an entity
///
/// Positions are in game pixels, rotation is in radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec2,
    /// Rotation around the entity origin, counter-clockwise
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with the given position and rotation
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Direction the entity is facing, derived from its rotation
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }
}

/// Name component for user-friendly entity identification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
