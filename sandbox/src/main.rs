//! Headless sandbox exercising the engine's gameplay loop
//!
//! Spawns a small scene, runs a fixed-timestep loop for a few seconds of
//! simulated time, then saves the world to a scene file.

use ember2d::prelude::*;
use tracing::info;

const FIXED_DELTA: f32 = 1.0 / 60.0;
const SIMULATED_SECONDS: u32 = 5;

fn main() {
    ember2d::init_logging();
    info!("Starting sandbox");

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();
    let mut script_engine = ScriptEngine::with_config(AssetConfig::new(
        "sandbox/assets".into(),
        "scripts".to_string(),
        "scenes".to_string(),
    ));

    world.spawn((
        Transform::from_position(Vec2::new(0.0, 0.0)),
        Name::new("ground"),
        RigidBody::fixed(),
        Collider::boxed(640.0, 16.0),
    ));

    world.spawn((
        Transform::from_position(Vec2::new(0.0, 300.0)),
        Name::new("ball"),
        RigidBody::dynamic(),
        Collider::circle(16.0),
        ScriptRef::new("bouncer"),
    ));

    world.spawn((
        Transform::from_position(Vec2::new(200.0, 32.0)),
        Name::new("hero"),
        Stats::default(),
        Movement::default(),
        ScriptRef::new("wanderer"),
    ));

    for frame in 0..(SIMULATED_SECONDS * 60) {
        script_execution_system(&mut world, &mut script_engine, FIXED_DELTA);
        stat_sync_system(&mut world);
        physics_step_system(&mut world, &mut physics);

        if frame % 60 == 0 {
            log_world_state(&world, frame);
        }
    }

    let scene_path = std::path::Path::new("sandbox/assets/scenes/sandbox_end.json");
    if let Some(parent) = scene_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %e, "Could not create scenes directory");
        }
    }
    match world.save_scene(scene_path) {
        Ok(()) => info!(path = ?scene_path, "Final world state saved"),
        Err(e) => tracing::error!(error = %e, "Failed to save scene"),
    }

    info!("Sandbox finished");
}

fn log_world_state(world: &World, frame: u32) {
    for (_, (name, transform)) in world.query::<(&Name, &Transform)>().iter() {
        info!(
            frame = frame,
            name = %name.0,
            x = transform.position.x,
            y = transform.position.y,
            "entity"
        );
    }
}
