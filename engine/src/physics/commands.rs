//! Physics command queue
//!
//! Scripts and gameplay code never touch the rapier sets directly while a
//! frame is in flight. They queue commands here; the physics system drains
//! the queue right before stepping the simulation.

use crate::physics::components::{BodyDef, ColliderDef};
use glam::Vec2;

/// Physics command to be executed by the physics system
#[derive(Debug, Clone)]
pub enum PhysicsCommand {
    /// Rebuild the entity's body from a new definition, disposing the old
    /// body at the next safe point
    Instantiate {
        /// Target entity ID
        entity: u64,
        /// Definition for the replacement body
        def: BodyDef,
    },

    /// Attach a collider to the entity's current body
    AddCollider {
        /// Target entity ID
        entity: u64,
        /// Definition for the new collider
        def: ColliderDef,
    },

    /// Teleport the body to a position and zero its velocity
    WarpTo {
        /// Target entity ID
        entity: u64,
        /// Destination in pixels
        position: Vec2,
    },

    /// Apply a force at the body's center of mass
    ApplyForce {
        /// Target entity ID
        entity: u64,
        /// Force vector in pixel units
        force: Vec2,
    },

    /// Apply a force at an absolute world point
    ApplyForceAtPoint {
        /// Target entity ID
        entity: u64,
        /// Force vector in pixel units
        force: Vec2,
        /// World point of application, in pixels
        point: Vec2,
    },

    /// Apply a force at a point relative to the body's origin
    ApplyForceAtLocalPoint {
        /// Target entity ID
        entity: u64,
        /// Force vector in pixel units
        force: Vec2,
        /// Local point of application, in pixels
        point: Vec2,
    },

    /// Apply an impulse at the body's center of mass
    ApplyImpulse {
        /// Target entity ID
        entity: u64,
        /// Impulse vector in pixel units
        impulse: Vec2,
    },

    /// Apply an impulse at an absolute world point
    ApplyImpulseAtPoint {
        /// Target entity ID
        entity: u64,
        /// Impulse vector in pixel units
        impulse: Vec2,
        /// World point of application, in pixels
        point: Vec2,
    },

    /// Apply an impulse at a point relative to the body's origin
    ApplyImpulseAtLocalPoint {
        /// Target entity ID
        entity: u64,
        /// Impulse vector in pixel units
        impulse: Vec2,
        /// Local point of application, in pixels
        point: Vec2,
    },

    /// Set the linear velocity of the body
    SetLinearVelocity {
        /// Target entity ID
        entity: u64,
        /// Velocity in pixels per second
        velocity: Vec2,
    },
}

thread_local! {
    static PHYSICS_COMMAND_QUEUE: std::cell::RefCell<Vec<PhysicsCommand>> =
        const { std::cell::RefCell::new(Vec::new()) };
}

/// Queue a physics command for execution in the next physics update
pub fn queue_physics_command(command: PhysicsCommand) {
    PHYSICS_COMMAND_QUEUE.with(|queue| {
        queue.borrow_mut().push(command);
    });
}

/// Drain all queued physics commands
pub(crate) fn drain_physics_commands() -> Vec<PhysicsCommand> {
    PHYSICS_COMMAND_QUEUE.with(|queue| queue.borrow_mut().drain(..).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_and_drain() {
        // Start clean in case another test on this thread left commands behind
        let _ = drain_physics_commands();

        queue_physics_command(PhysicsCommand::ApplyForce {
            entity: 1,
            force: Vec2::new(10.0, 0.0),
        });
        queue_physics_command(PhysicsCommand::WarpTo {
            entity: 1,
            position: Vec2::ZERO,
        });

        let drained = drain_physics_commands();
        assert_eq!(drained.len(), 2);
        assert!(drain_physics_commands().is_empty());
    }
}
