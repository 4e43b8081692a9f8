//! ember2d - ECS building blocks for a 2D game engine
//!
//! This crate provides the gameplay-facing component layer of the engine:
//! transform and stat components, a rigid-body wrapper around the rapier2d
//! physics library, and rhai scripting bindings for all of it.

pub mod config;
pub mod core;
pub mod io;
pub mod physics;
pub mod scripting;
pub mod stats;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{Entity, Name, Transform, World};

    // Math types
    pub use glam::Vec2;

    // Physics types
    pub use crate::physics::{
        physics_step_system, BodyDef, BodyKind, Collider, ColliderDef, ColliderShape,
        PhysicsCommand, PhysicsWorld, RigidBody,
    };

    // Stat types
    pub use crate::stats::{stat_sync_system, Movement, Stats};

    // Scripting types
    pub use crate::scripting::{script_execution_system, ScriptEngine, ScriptRef};

    // IO types
    pub use crate::io::{Scene, SceneError};

    // Config types
    pub use crate::config::{AssetConfig, AssetError};
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
