//! Integration tests for the ECS-facing physics layer

use ember2d::core::entity::{Transform, World};
use ember2d::physics::{
    physics_step_system, BodyDef, Collider, PhysicsCommand, PhysicsWorld, RigidBody,
};
use glam::Vec2;
use tracing::info;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

#[test]
fn test_dynamic_body_falls_under_gravity() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    let ball = world.spawn((
        Transform::from_position(Vec2::new(0.0, 320.0)),
        RigidBody::dynamic(),
        Collider::circle(16.0),
    ));

    // 1 second of simulation at 60 Hz
    for _ in 0..60 {
        physics_step_system(&mut world, &mut physics);
    }

    let transform = world.get::<Transform>(ball).unwrap();
    info!(position = ?transform.position, "Ball after one second");

    // Gravity is -9.81 m/s^2 = about -314 px/s^2, so after one second the
    // ball should have dropped roughly 150 px
    assert!(
        transform.position.y < 220.0,
        "Ball should have fallen well below its spawn point, but is at y={}",
        transform.position.y
    );
}

#[test]
fn test_static_body_never_moves() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    let ground = world.spawn((
        Transform::from_position(Vec2::new(0.0, 16.0)),
        RigidBody::fixed(),
        Collider::boxed(320.0, 16.0),
    ));

    for _ in 0..30 {
        physics_step_system(&mut world, &mut physics);
    }

    let transform = world.get::<Transform>(ground).unwrap();
    assert_eq!(
        transform.position,
        Vec2::new(0.0, 16.0),
        "Static bodies must keep their spawn position"
    );
}

#[test]
fn test_ball_rests_on_ground() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    world.spawn((
        Transform::from_position(Vec2::new(0.0, 0.0)),
        RigidBody::fixed(),
        Collider::boxed(320.0, 16.0),
    ));
    let ball = world.spawn((
        Transform::from_position(Vec2::new(0.0, 200.0)),
        RigidBody::dynamic(),
        Collider::circle(16.0),
    ));

    // Long enough for the ball to drop and settle
    for _ in 0..180 {
        physics_step_system(&mut world, &mut physics);
    }

    let transform = world.get::<Transform>(ball).unwrap();
    info!(position = ?transform.position, "Ball after settling");

    // Ground top edge is at y=16, ball radius is 16, so the ball center
    // should come to rest around y=32
    assert!(
        (transform.position.y - 32.0).abs() < 4.0,
        "Ball should rest on the ground near y=32, but is at y={}",
        transform.position.y
    );
}

#[test]
fn test_warp_command_teleports_and_stops_body() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    // No gravity so the warped position is exact after the step
    let entity = world.spawn((
        Transform::from_position(Vec2::new(0.0, 100.0)),
        RigidBody::new(BodyDef::default().with_gravity_scale(0.0)),
        Collider::circle(16.0),
    ));

    physics_step_system(&mut world, &mut physics);

    let entity_id = entity.to_bits().get();
    ember2d::physics::queue_physics_command(PhysicsCommand::SetLinearVelocity {
        entity: entity_id,
        velocity: Vec2::new(640.0, 0.0),
    });
    physics_step_system(&mut world, &mut physics);

    // The body is now moving; warping must both relocate it and kill that motion
    ember2d::physics::queue_physics_command(PhysicsCommand::WarpTo {
        entity: entity_id,
        position: Vec2::new(50.0, 75.0),
    });
    physics_step_system(&mut world, &mut physics);

    {
        let transform = world.get::<Transform>(entity).unwrap();
        assert!(
            (transform.position - Vec2::new(50.0, 75.0)).length() < 0.5,
            "Body should sit at the warp target, but is at {:?}",
            transform.position
        );
    }

    // Another step without commands: a stopped body stays put
    physics_step_system(&mut world, &mut physics);
    let transform = world.get::<Transform>(entity).unwrap();
    assert!(
        (transform.position - Vec2::new(50.0, 75.0)).length() < 0.5,
        "Warp must zero the velocity, but the body drifted to {:?}",
        transform.position
    );
}

#[test]
fn test_impulse_command_moves_body() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    // 16x16 px box at density 1 gives the body about 1 kg of mass
    let entity = world.spawn((
        Transform::from_position(Vec2::ZERO),
        RigidBody::new(BodyDef::default().with_gravity_scale(0.0)),
        Collider::boxed(16.0, 16.0),
    ));

    physics_step_system(&mut world, &mut physics);

    ember2d::physics::queue_physics_command(PhysicsCommand::ApplyImpulse {
        entity: entity.to_bits().get(),
        impulse: Vec2::new(320.0, 0.0),
    });

    for _ in 0..10 {
        physics_step_system(&mut world, &mut physics);
    }

    let transform = world.get::<Transform>(entity).unwrap();
    info!(position = ?transform.position, "Body after impulse");
    assert!(
        transform.position.x > 10.0,
        "Impulse should have pushed the body along +x, but it is at x={}",
        transform.position.x
    );
    assert!(
        transform.position.y.abs() < 0.5,
        "Impulse along x must not move the body vertically"
    );
}

#[test]
fn test_instantiate_command_rebuilds_body_once() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    let entity = world.spawn((
        Transform::from_position(Vec2::new(0.0, 64.0)),
        RigidBody::dynamic(),
    ));

    physics_step_system(&mut world, &mut physics);
    let first = physics.body_handle(entity).expect("body should exist");

    ember2d::physics::queue_physics_command(PhysicsCommand::Instantiate {
        entity: entity.to_bits().get(),
        def: BodyDef::new(ember2d::physics::BodyKind::Static),
    });
    physics_step_system(&mut world, &mut physics);

    let second = physics.body_handle(entity).expect("replacement should exist");
    assert_ne!(first, second, "Instantiate must build a fresh body");

    {
        let rb = world.get::<RigidBody>(entity).unwrap();
        assert_eq!(rb.handle, Some(second));
        assert_eq!(rb.def.kind, ember2d::physics::BodyKind::Static);
    }

    // The old body lingers on the dispose queue until the next step flushes it
    assert_eq!(physics.pending_disposals(), 1);
    physics_step_system(&mut world, &mut physics);
    assert_eq!(physics.pending_disposals(), 0);
    assert_eq!(physics.body_count(), 1);
}

#[test]
fn test_despawn_releases_physics_body() {
    init_logging();

    let mut world = World::new();
    let mut physics = PhysicsWorld::new();

    let entity = world.spawn((Transform::default(), RigidBody::dynamic()));
    physics_step_system(&mut world, &mut physics);
    assert_eq!(physics.body_count(), 1);

    world.despawn(entity).unwrap();

    // One step to notice the despawn, one more to flush the dispose queue
    physics_step_system(&mut world, &mut physics);
    physics_step_system(&mut world, &mut physics);

    assert_eq!(
        physics.body_count(),
        0,
        "Despawned entities must not leak physics bodies"
    );
}
