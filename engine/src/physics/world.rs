//! Physics world resource managing the rapier simulation
//!
//! Wraps all rapier2d structures needed for stepping the simulation and
//! maps ECS entities to body and collider handles. Bodies replaced while
//! the simulation may still reference them are parked on a dispose queue
//! and only destroyed between steps.

use crate::core::entity::Entity;
use crate::physics::components::{BodyDef, ColliderDef};
use crate::physics::units;
use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Physics world resource containing all rapier structures
pub struct PhysicsWorld {
    /// Set of rigid bodies in the simulation
    pub rigid_body_set: RigidBodySet,
    /// Set of colliders in the simulation
    pub collider_set: ColliderSet,
    /// Integration parameters for the simulation
    pub integration_parameters: IntegrationParameters,
    /// Physics pipeline for stepping the simulation
    pub physics_pipeline: PhysicsPipeline,
    /// Island manager for grouping connected bodies
    pub island_manager: IslandManager,
    /// Broad phase for coarse collision detection
    pub broad_phase: BroadPhase,
    /// Narrow phase for precise collision detection
    pub narrow_phase: NarrowPhase,
    /// Set of impulse-based joints
    pub impulse_joint_set: ImpulseJointSet,
    /// Set of multibody (articulated) joints
    pub multibody_joint_set: MultibodyJointSet,
    /// CCD solver for continuous collision detection
    pub ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and shape queries
    pub query_pipeline: QueryPipeline,
    /// Gravity vector in physics units
    pub gravity: Vector<Real>,

    entity_to_body: HashMap<Entity, RigidBodyHandle>,
    body_to_entity: HashMap<RigidBodyHandle, Entity>,
    dispose_queue: Vec<RigidBodyHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        info!("Initializing physics world");

        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep for deterministic simulation (60 Hz)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: Vector::new(0.0, -9.81),
            entity_to_body: HashMap::new(),
            body_to_entity: HashMap::new(),
            dispose_queue: Vec::new(),
        }
    }

    /// Set the gravity vector, in pixels per second squared
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = units::to_physics(gravity);
        debug!(gravity = ?self.gravity, "Physics gravity set");
    }

    /// Get the rigid body handle for an entity
    pub fn body_handle(&self, entity: Entity) -> Option<RigidBodyHandle> {
        self.entity_to_body.get(&entity).copied()
    }

    /// Get the entity for a rigid body handle
    pub fn entity_for_body(&self, handle: RigidBodyHandle) -> Option<Entity> {
        self.body_to_entity.get(&handle).copied()
    }

    /// Entities currently registered with a body
    pub fn registered_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entity_to_body.keys().copied()
    }

    /// Number of live bodies in the simulation (including ones pending disposal)
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of bodies waiting on the dispose queue
    pub fn pending_disposals(&self) -> usize {
        self.dispose_queue.len()
    }

    /// Create a body for an entity from a definition, at a pixel-space pose
    pub fn create_body(
        &mut self,
        entity: Entity,
        def: BodyDef,
        position: Vec2,
        rotation: f32,
    ) -> RigidBodyHandle {
        let builder = RigidBodyBuilder::new(def.kind.to_rapier())
            .translation(units::to_physics(position))
            .rotation(rotation)
            .gravity_scale(def.gravity_scale);

        let handle = self.rigid_body_set.insert(builder);
        self.entity_to_body.insert(entity, handle);
        self.body_to_entity.insert(handle, entity);
        debug!(entity = ?entity, "Created rigid body");
        handle
    }

    /// Replace the body of an entity with one built from a new definition
    ///
    /// The old body is not destroyed here; it goes onto the dispose queue
    /// and is removed at the next `flush_disposed` between steps.
    pub fn replace_body(
        &mut self,
        entity: Entity,
        def: BodyDef,
        position: Vec2,
        rotation: f32,
    ) -> RigidBodyHandle {
        if let Some(old) = self.entity_to_body.remove(&entity) {
            self.body_to_entity.remove(&old);
            self.dispose_queue.push(old);
            debug!(entity = ?entity, "Queued replaced body for disposal");
        }
        self.create_body(entity, def, position, rotation)
    }

    /// Attach a collider to the entity's current body
    pub fn attach_collider(
        &mut self,
        entity: Entity,
        def: &ColliderDef,
    ) -> Option<ColliderHandle> {
        let Some(body_handle) = self.body_handle(entity) else {
            warn!(entity = ?entity, "Cannot attach collider: entity has no body");
            return None;
        };

        let handle = self.collider_set.insert_with_parent(
            def.builder(),
            body_handle,
            &mut self.rigid_body_set,
        );
        debug!(entity = ?entity, "Attached collider");
        Some(handle)
    }

    /// Teleport a body to a pixel-space position and zero its velocity
    pub fn warp_to(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(units::to_physics(position), true);
            body.set_linvel(Vector::new(0.0, 0.0), true);
            body.set_angvel(0.0, true);
        }
    }

    /// Mark an entity's body for deferred destruction
    ///
    /// Used when the entity is despawned from the ECS. The body stays in
    /// the simulation until the next `flush_disposed`.
    pub fn release_entity(&mut self, entity: Entity) {
        if let Some(handle) = self.entity_to_body.remove(&entity) {
            self.body_to_entity.remove(&handle);
            self.dispose_queue.push(handle);
            debug!(entity = ?entity, "Released physics body for removed entity");
        }
    }

    /// Destroy all bodies on the dispose queue
    ///
    /// Must only be called between simulation steps.
    pub fn flush_disposed(&mut self) -> usize {
        let count = self.dispose_queue.len();
        for handle in self.dispose_queue.drain(..) {
            self.rigid_body_set.remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
        if count > 0 {
            debug!(count = count, "Flushed disposed bodies");
        }
        count
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::components::BodyKind;

    fn spawn_entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    #[test]
    fn test_create_body_registers_entity() {
        let mut physics = PhysicsWorld::new();
        let entity = spawn_entity();

        let handle = physics.create_body(
            entity,
            BodyDef::default(),
            Vec2::new(64.0, 32.0),
            0.0,
        );

        assert_eq!(physics.body_handle(entity), Some(handle));
        assert_eq!(physics.entity_for_body(handle), Some(entity));
        assert_eq!(physics.body_count(), 1);

        let body = &physics.rigid_body_set[handle];
        let position = units::to_pixels(body.translation());
        assert!((position - Vec2::new(64.0, 32.0)).length() < 1e-3);
    }

    #[test]
    fn test_warp_zeroes_velocity() {
        let mut physics = PhysicsWorld::new();
        let entity = spawn_entity();
        let handle = physics.create_body(entity, BodyDef::default(), Vec2::ZERO, 0.0);

        {
            let body = physics.rigid_body_set.get_mut(handle).unwrap();
            body.set_linvel(Vector::new(3.0, -2.0), true);
            body.set_angvel(1.5, true);
        }

        physics.warp_to(handle, Vec2::new(100.0, 200.0));

        let body = &physics.rigid_body_set[handle];
        assert_eq!(body.linvel().norm(), 0.0);
        assert_eq!(body.angvel(), 0.0);
        let position = units::to_pixels(body.translation());
        assert!((position - Vec2::new(100.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn test_replace_body_defers_destruction() {
        let mut physics = PhysicsWorld::new();
        let entity = spawn_entity();

        let first = physics.create_body(entity, BodyDef::default(), Vec2::ZERO, 0.0);
        let second = physics.replace_body(
            entity,
            BodyDef::new(BodyKind::Static),
            Vec2::ZERO,
            0.0,
        );

        assert_ne!(first, second);
        // Old body still alive until the flush, but no longer mapped
        assert_eq!(physics.body_count(), 2);
        assert_eq!(physics.pending_disposals(), 1);
        assert_eq!(physics.body_handle(entity), Some(second));
        assert_eq!(physics.entity_for_body(first), None);

        assert_eq!(physics.flush_disposed(), 1);
        assert_eq!(physics.body_count(), 1);
        assert_eq!(physics.pending_disposals(), 0);
        assert!(physics.rigid_body_set.get(first).is_none());
        assert!(physics.rigid_body_set.get(second).is_some());
    }

    #[test]
    fn test_attach_collider_requires_body() {
        let mut physics = PhysicsWorld::new();
        let entity = spawn_entity();

        assert!(physics.attach_collider(entity, &ColliderDef::default()).is_none());

        physics.create_body(entity, BodyDef::default(), Vec2::ZERO, 0.0);
        assert!(physics.attach_collider(entity, &ColliderDef::default()).is_some());
        assert_eq!(physics.collider_set.len(), 1);
    }
}
