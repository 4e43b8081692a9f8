//! Entity-Component System (ECS) functionality
//!
//! This module provides the core ECS functionality for the engine:
//! the transform component and a thin wrapper around the hecs world.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{Name, Transform};
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
