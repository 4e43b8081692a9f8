//! Physics layer wrapping rapier2d
//!
//! The rapier world owns the bodies; ECS entities carry `RigidBody` and
//! `Collider` components holding non-owning handles. Gameplay and scripts
//! talk to the simulation through a command queue drained once per step,
//! and all pixel/meter conversion happens at this boundary.

pub mod commands;
pub mod components;
pub mod system;
pub mod units;
pub mod world;

// Re-export commonly used types
pub use commands::{queue_physics_command, PhysicsCommand};
pub use components::{BodyDef, BodyKind, Collider, ColliderDef, ColliderShape, RigidBody};
pub use system::physics_step_system;
pub use units::PIXELS_PER_METER;
pub use world::PhysicsWorld;

// Re-export commonly used rapier types
pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
