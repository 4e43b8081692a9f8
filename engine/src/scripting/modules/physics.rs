//! Physics API for rhai scripts
//!
//! Exposes the body/collider definition types, the shape factories, and a
//! `physics` module whose functions queue commands against the physics
//! system. Scripts never hold a reference to the rapier world itself.

use crate::physics::commands::queue_physics_command;
use crate::physics::components::{BodyDef, BodyKind, ColliderDef, ColliderShape};
use crate::physics::{PhysicsCommand, PIXELS_PER_METER};
use crate::scripting::modules::math::parse_vec2_from_dynamic;
use rhai::{Dynamic, Engine, EvalAltResult, Module};
use tracing::{debug, trace};

/// Register the physics definition types and shape factories
pub fn register_physics_api(engine: &mut Engine) {
    debug!("Registering physics API");

    engine
        .register_type_with_name::<BodyKind>("BodyKind")
        .register_fn("==", |a: BodyKind, b: BodyKind| a == b);

    engine
        .register_type_with_name::<BodyDef>("BodyDef")
        .register_fn("body_def", BodyDef::default)
        .register_get_set(
            "kind",
            |def: &mut BodyDef| def.kind,
            |def: &mut BodyDef, kind: BodyKind| def.kind = kind,
        )
        .register_get_set(
            "gravity_scale",
            |def: &mut BodyDef| def.gravity_scale as f64,
            |def: &mut BodyDef, g: f64| def.gravity_scale = g as f32,
        );

    // Shape factories build shapes from game-space pixel coordinates
    engine
        .register_type_with_name::<ColliderShape>("ColliderShape")
        .register_fn("box_shape", |hw: f64, hh: f64| {
            ColliderShape::boxed(hw as f32, hh as f32)
        })
        .register_fn("circle_shape", |x: f64, y: f64, r: f64| {
            ColliderShape::circle(x as f32, y as f32, r as f32)
        })
        .register_fn("segment_shape", |x1: f64, y1: f64, x2: f64, y2: f64| {
            ColliderShape::segment(x1 as f32, y1 as f32, x2 as f32, y2 as f32)
        });

    // Material properties are stored in physics units but exposed to
    // scripts through the fixed pixel scale
    engine
        .register_type_with_name::<ColliderDef>("ColliderDef")
        .register_fn("collider_def", ColliderDef::new)
        .register_get_set(
            "shape",
            |def: &mut ColliderDef| def.shape,
            |def: &mut ColliderDef, shape: ColliderShape| def.shape = shape,
        )
        .register_get_set(
            "density",
            |def: &mut ColliderDef| (def.density * PIXELS_PER_METER) as f64,
            |def: &mut ColliderDef, d: f64| def.density = d as f32 / PIXELS_PER_METER,
        )
        .register_get_set(
            "friction",
            |def: &mut ColliderDef| (def.friction * PIXELS_PER_METER) as f64,
            |def: &mut ColliderDef, f: f64| def.friction = f as f32 / PIXELS_PER_METER,
        )
        .register_get_set(
            "restitution",
            |def: &mut ColliderDef| (def.restitution * PIXELS_PER_METER) as f64,
            |def: &mut ColliderDef, r: f64| def.restitution = r as f32 / PIXELS_PER_METER,
        )
        .register_get_set(
            "sensor",
            |def: &mut ColliderDef| def.sensor,
            |def: &mut ColliderDef, s: bool| def.sensor = s,
        );

    debug!("Physics API registered");
}

/// Create the `physics` module for scripts
pub fn create_physics_module() -> Module {
    let mut module = Module::new();

    // Body type enumeration
    module.set_var("DYNAMIC_BODY", BodyKind::Dynamic);
    module.set_var("KINEMATIC_BODY", BodyKind::Kinematic);
    module.set_var("STATIC_BODY", BodyKind::Static);

    // Rebuild the entity's body from a definition
    module.set_native_fn(
        "instantiate",
        move |entity: i64, def: BodyDef| -> Result<(), Box<EvalAltResult>> {
            queue_physics_command(PhysicsCommand::Instantiate {
                entity: entity as u64,
                def,
            });
            trace!(entity = entity, "Queued instantiate command");
            Ok(())
        },
    );

    // Attach a collider to the entity's body
    module.set_native_fn(
        "add_collider",
        move |entity: i64, def: ColliderDef| -> Result<(), Box<EvalAltResult>> {
            queue_physics_command(PhysicsCommand::AddCollider {
                entity: entity as u64,
                def,
            });
            trace!(entity = entity, "Queued add_collider command");
            Ok(())
        },
    );

    // Teleport, zeroing velocity
    module.set_native_fn(
        "warp_to",
        move |entity: i64, position: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let position = parse_vec2_from_dynamic(position)?;
            queue_physics_command(PhysicsCommand::WarpTo {
                entity: entity as u64,
                position,
            });
            trace!(entity = entity, position = ?position, "Queued warp_to command");
            Ok(())
        },
    );

    // Force family
    module.set_native_fn(
        "apply_force",
        move |entity: i64, force: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let force = parse_vec2_from_dynamic(force)?;
            queue_physics_command(PhysicsCommand::ApplyForce {
                entity: entity as u64,
                force,
            });
            trace!(entity = entity, force = ?force, "Queued apply_force command");
            Ok(())
        },
    );

    module.set_native_fn(
        "apply_force_at",
        move |entity: i64, force: Dynamic, point: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let force = parse_vec2_from_dynamic(force)?;
            let point = parse_vec2_from_dynamic(point)?;
            queue_physics_command(PhysicsCommand::ApplyForceAtPoint {
                entity: entity as u64,
                force,
                point,
            });
            Ok(())
        },
    );

    module.set_native_fn(
        "apply_force_local",
        move |entity: i64, force: Dynamic, point: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let force = parse_vec2_from_dynamic(force)?;
            let point = parse_vec2_from_dynamic(point)?;
            queue_physics_command(PhysicsCommand::ApplyForceAtLocalPoint {
                entity: entity as u64,
                force,
                point,
            });
            Ok(())
        },
    );

    // Impulse family
    module.set_native_fn(
        "apply_impulse",
        move |entity: i64, impulse: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let impulse = parse_vec2_from_dynamic(impulse)?;
            queue_physics_command(PhysicsCommand::ApplyImpulse {
                entity: entity as u64,
                impulse,
            });
            trace!(entity = entity, impulse = ?impulse, "Queued apply_impulse command");
            Ok(())
        },
    );

    module.set_native_fn(
        "apply_impulse_at",
        move |entity: i64, impulse: Dynamic, point: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let impulse = parse_vec2_from_dynamic(impulse)?;
            let point = parse_vec2_from_dynamic(point)?;
            queue_physics_command(PhysicsCommand::ApplyImpulseAtPoint {
                entity: entity as u64,
                impulse,
                point,
            });
            Ok(())
        },
    );

    module.set_native_fn(
        "apply_impulse_local",
        move |entity: i64, impulse: Dynamic, point: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let impulse = parse_vec2_from_dynamic(impulse)?;
            let point = parse_vec2_from_dynamic(point)?;
            queue_physics_command(PhysicsCommand::ApplyImpulseAtLocalPoint {
                entity: entity as u64,
                impulse,
                point,
            });
            Ok(())
        },
    );

    // Velocity
    module.set_native_fn(
        "set_velocity",
        move |entity: i64, velocity: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let velocity = parse_vec2_from_dynamic(velocity)?;
            queue_physics_command(PhysicsCommand::SetLinearVelocity {
                entity: entity as u64,
                velocity,
            });
            Ok(())
        },
    );

    module
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::commands::drain_physics_commands;

    #[test]
    fn test_physics_module_creation() {
        let module = create_physics_module();
        assert!(!module.is_empty());
    }

    #[test]
    fn test_scaled_material_properties() {
        let mut engine = Engine::new();
        crate::scripting::modules::math::register_math_api(&mut engine);
        register_physics_api(&mut engine);

        let def: ColliderDef = engine
            .eval(
                r#"
                let def = collider_def(box_shape(16.0, 16.0));
                def.density = 64.0;
                def.friction = 16.0;
                def
            "#,
            )
            .unwrap();

        // Stored values are divided down by the pixel scale
        assert!((def.density - 64.0 / PIXELS_PER_METER).abs() < 1e-6);
        assert!((def.friction - 16.0 / PIXELS_PER_METER).abs() < 1e-6);

        // And the script-visible getter round-trips
        let read_back: f64 = engine
            .eval(
                r#"
                let def = collider_def(box_shape(16.0, 16.0));
                def.density = 64.0;
                def.density
            "#,
            )
            .unwrap();
        assert!((read_back - 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_module_functions_queue_commands() {
        let _ = drain_physics_commands();

        let mut engine = Engine::new();
        crate::scripting::modules::math::register_math_api(&mut engine);
        register_physics_api(&mut engine);
        engine.register_static_module("physics", create_physics_module().into());

        engine
            .run(
                r#"
                physics::apply_force(1, vec2(10.0, 0.0));
                physics::warp_to(1, vec2(0.0, 0.0));
                let def = body_def();
                def.kind = physics::STATIC_BODY;
                physics::instantiate(1, def);
            "#,
            )
            .unwrap();

        let commands = drain_physics_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], PhysicsCommand::ApplyForce { .. }));
        assert!(matches!(commands[1], PhysicsCommand::WarpTo { .. }));
        assert!(matches!(
            commands[2],
            PhysicsCommand::Instantiate {
                def: BodyDef {
                    kind: BodyKind::Static,
                    ..
                },
                ..
            }
        ));
    }
}
