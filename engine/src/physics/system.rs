//! Physics update system
//!
//! Synchronizes the ECS with the rapier simulation: creates bodies and
//! colliders for new components, drains the command queue, steps the
//! simulation, and writes resulting poses back into `Transform`.

use crate::core::entity::{Entity, Transform, World};
use crate::physics::commands::drain_physics_commands;
use crate::physics::components::{BodyKind, Collider, RigidBody};
use crate::physics::units;
use crate::physics::{PhysicsCommand, PhysicsWorld};
use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use tracing::{trace, warn};

/// Run one fixed physics step and synchronize with the ECS
pub fn physics_step_system(world: &mut World, physics: &mut PhysicsWorld) {
    trace!("Physics step starting");

    // Safe point between steps: destroy bodies replaced last frame
    physics.flush_disposed();

    create_missing_bodies(world, physics);
    create_missing_colliders(world, physics);
    process_commands(world, physics);

    physics.step();

    // Forces last one step only: clear what scripts applied this frame
    for (_, body) in physics.rigid_body_set.iter_mut() {
        if body.is_dynamic() {
            body.reset_forces(false);
        }
    }

    write_back_poses(world, physics);
    release_removed_entities(world, physics);

    trace!("Physics step completed");
}

/// Create bodies for entities whose RigidBody component has no handle yet
fn create_missing_bodies(world: &mut World, physics: &mut PhysicsWorld) {
    let mut pending = Vec::new();
    for (entity, (rb, transform)) in world.query::<(&RigidBody, Option<&Transform>)>().iter() {
        if rb.handle.is_none() {
            let transform = transform.copied().unwrap_or_default();
            pending.push((entity, rb.def, transform));
        }
    }

    for (entity, def, transform) in pending {
        let handle = physics.create_body(entity, def, transform.position, transform.rotation);
        if let Ok(mut rb) = world.get_mut::<RigidBody>(entity) {
            rb.handle = Some(handle);
            rb.out_of_sync = true;
        }
    }
}

/// Create colliders for entities with a Collider component but no handle
fn create_missing_colliders(world: &mut World, physics: &mut PhysicsWorld) {
    let mut pending = Vec::new();
    for (entity, (collider, rb)) in world.query::<(&Collider, &RigidBody)>().iter() {
        if collider.handle.is_none() && rb.handle.is_some() {
            pending.push((entity, collider.def.clone()));
        }
    }

    for (entity, def) in pending {
        if let Some(handle) = physics.attach_collider(entity, &def) {
            if let Ok(mut collider) = world.get_mut::<Collider>(entity) {
                collider.handle = Some(handle);
            }
        }
    }
}

fn resolve(world: &World, physics: &PhysicsWorld, raw: u64) -> Option<(Entity, RigidBodyHandle)> {
    let Some(entity) = Entity::from_bits(raw) else {
        warn!(entity = raw, "Physics command targets invalid entity ID");
        return None;
    };
    if !world.contains(entity) {
        warn!(entity = raw, "Physics command targets missing entity");
        return None;
    }
    let Some(handle) = physics.body_handle(entity) else {
        warn!(entity = raw, "Physics command targets entity without a body");
        return None;
    };
    Some((entity, handle))
}

/// Drain and execute queued physics commands
fn process_commands(world: &mut World, physics: &mut PhysicsWorld) {
    for command in drain_physics_commands() {
        match command {
            PhysicsCommand::Instantiate { entity, def } => {
                let Some(entity) = Entity::from_bits(entity).filter(|e| world.contains(*e)) else {
                    warn!(entity = entity, "Instantiate targets missing entity");
                    continue;
                };
                let pose = world
                    .get::<Transform>(entity)
                    .map(|t| *t)
                    .unwrap_or_default();
                let handle = physics.replace_body(entity, def, pose.position, pose.rotation);
                if let Ok(mut rb) = world.get_mut::<RigidBody>(entity) {
                    rb.def = def;
                    rb.handle = Some(handle);
                    rb.out_of_sync = true;
                }
                // Attached colliders died with the old body
                if let Ok(mut collider) = world.get_mut::<Collider>(entity) {
                    collider.handle = None;
                }
            }
            PhysicsCommand::AddCollider { entity, def } => {
                let Some(entity) = Entity::from_bits(entity).filter(|e| world.contains(*e)) else {
                    warn!(entity = entity, "AddCollider targets missing entity");
                    continue;
                };
                physics.attach_collider(entity, &def);
            }
            PhysicsCommand::WarpTo { entity, position } => {
                if let Some((entity, handle)) = resolve(world, physics, entity) {
                    physics.warp_to(handle, position);
                    if let Ok(mut rb) = world.get_mut::<RigidBody>(entity) {
                        rb.out_of_sync = true;
                    }
                }
            }
            PhysicsCommand::ApplyForce { entity, force } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        body.add_force(units::to_physics(force), true);
                    }
                }
            }
            PhysicsCommand::ApplyForceAtPoint {
                entity,
                force,
                point,
            } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        body.add_force_at_point(
                            units::to_physics(force),
                            units::to_physics_point(point),
                            true,
                        );
                    }
                }
            }
            PhysicsCommand::ApplyForceAtLocalPoint {
                entity,
                force,
                point,
            } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        let world_point = body.position() * units::to_physics_point(point);
                        body.add_force_at_point(units::to_physics(force), world_point, true);
                    }
                }
            }
            PhysicsCommand::ApplyImpulse { entity, impulse } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        body.apply_impulse(units::to_physics(impulse), true);
                    }
                }
            }
            PhysicsCommand::ApplyImpulseAtPoint {
                entity,
                impulse,
                point,
            } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        body.apply_impulse_at_point(
                            units::to_physics(impulse),
                            units::to_physics_point(point),
                            true,
                        );
                    }
                }
            }
            PhysicsCommand::ApplyImpulseAtLocalPoint {
                entity,
                impulse,
                point,
            } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        let world_point = body.position() * units::to_physics_point(point);
                        body.apply_impulse_at_point(units::to_physics(impulse), world_point, true);
                    }
                }
            }
            PhysicsCommand::SetLinearVelocity { entity, velocity } => {
                if let Some((_, handle)) = resolve(world, physics, entity) {
                    if let Some(body) = physics.rigid_body_set.get_mut(handle) {
                        body.set_linvel(units::to_physics(velocity), true);
                    }
                }
            }
        }
    }
}

/// Write simulated poses back into Transform components
fn write_back_poses(world: &mut World, physics: &PhysicsWorld) {
    for (_, (transform, rb)) in world.query_mut::<(&mut Transform, &mut RigidBody)>() {
        let Some(handle) = rb.handle else { continue };
        let Some(body) = physics.rigid_body_set.get(handle) else {
            continue;
        };
        if rb.def.kind == BodyKind::Static {
            continue;
        }

        let position = units::to_pixels(body.translation());
        let angle = body.rotation().angle();

        if rb.out_of_sync {
            // Fresh or teleported body: snap, do not interpolate across the jump
            rb.previous_position = position;
            rb.previous_angle = angle;
            rb.out_of_sync = false;
        } else {
            rb.previous_position = transform.position;
            rb.previous_angle = transform.rotation;
        }

        transform.position = position;
        transform.rotation = angle;
    }
}

/// Queue disposal for bodies whose entities left the world
fn release_removed_entities(world: &World, physics: &mut PhysicsWorld) {
    let removed: Vec<Entity> = physics
        .registered_entities()
        .filter(|entity| !world.contains(*entity))
        .collect();

    for entity in removed {
        physics.release_entity(entity);
    }
}
