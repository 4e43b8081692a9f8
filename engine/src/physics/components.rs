//! Physics components for the entity system

use crate::core::entity::Transform;
use crate::physics::units;
use glam::Vec2;
use rapier2d::prelude::{ColliderBuilder, ColliderHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};

/// Kind of rigid body, mirroring the body types of the physics engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Fully simulated: affected by gravity, forces and collisions
    #[default]
    Dynamic,
    /// Moved by velocity only, ignores forces
    Kinematic,
    /// Never moves
    Static,
}

impl BodyKind {
    pub(crate) fn to_rapier(self) -> rapier2d::prelude::RigidBodyType {
        match self {
            BodyKind::Dynamic => rapier2d::prelude::RigidBodyType::Dynamic,
            BodyKind::Kinematic => rapier2d::prelude::RigidBodyType::KinematicVelocityBased,
            BodyKind::Static => rapier2d::prelude::RigidBodyType::Fixed,
        }
    }
}

/// Definition a rigid body is built from
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyDef {
    /// Body kind (dynamic, kinematic, static)
    pub kind: BodyKind,
    /// Multiplier applied to world gravity for this body
    pub gravity_scale: f32,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            gravity_scale: 1.0,
        }
    }
}

impl BodyDef {
    /// Create a body definition of the given kind
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the gravity scale
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }
}

/// Collision shape in game pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box given by half extents
    Box { half_width: f32, half_height: f32 },
    /// Circle with an offset from the body origin
    Circle { offset: Vec2, radius: f32 },
    /// Line segment between two local points
    Segment { a: Vec2, b: Vec2 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Box {
            half_width: 16.0,
            half_height: 16.0,
        }
    }
}

impl ColliderShape {
    /// Box shape from half extents in pixels
    pub fn boxed(half_width: f32, half_height: f32) -> Self {
        ColliderShape::Box {
            half_width,
            half_height,
        }
    }

    /// Circle shape at an offset from the body origin, radius in pixels
    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        ColliderShape::Circle {
            offset: Vec2::new(x, y),
            radius,
        }
    }

    /// Segment shape between two local points in pixels
    pub fn segment(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        ColliderShape::Segment {
            a: Vec2::new(x1, y1),
            b: Vec2::new(x2, y2),
        }
    }
}

/// Definition a collider is built from
///
/// Everything is expressed in pixel units; conversion to physics units
/// happens when the collider is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColliderDef {
    /// Collision shape
    pub shape: ColliderShape,
    /// Mass density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution (bounciness) coefficient
    pub restitution: f32,
    /// Sensors detect contacts but produce no collision response
    pub sensor: bool,
}

impl Default for ColliderDef {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            sensor: false,
        }
    }
}

impl ColliderDef {
    /// Create a collider definition with the given shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    pub(crate) fn builder(&self) -> ColliderBuilder {
        let builder = match self.shape {
            ColliderShape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(
                units::to_physics_scalar(half_width),
                units::to_physics_scalar(half_height),
            ),
            ColliderShape::Circle { offset, radius } => {
                ColliderBuilder::ball(units::to_physics_scalar(radius))
                    .translation(units::to_physics(offset))
            }
            ColliderShape::Segment { a, b } => ColliderBuilder::segment(
                units::to_physics_point(a),
                units::to_physics_point(b),
            ),
        };

        builder
            .density(self.density)
            .friction(self.friction)
            .restitution(self.restitution)
            .sensor(self.sensor)
    }
}

fn out_of_sync_default() -> bool {
    true
}

/// Rigid body component wrapping a body owned by the physics world
///
/// The physics world owns the actual body; this component holds a
/// non-owning handle. Replaced bodies go onto the world's dispose queue
/// instead of being destroyed immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    /// Definition the body was (or will be) built from
    pub def: BodyDef,
    /// Handle into the physics world, assigned by the physics system
    #[serde(skip)]
    pub handle: Option<RigidBodyHandle>,
    /// Position before the most recent simulation step, for interpolation
    #[serde(skip)]
    pub previous_position: Vec2,
    /// Angle before the most recent simulation step, for interpolation
    #[serde(skip)]
    pub previous_angle: f32,
    /// Set when the body was just created or teleported; the next sync
    /// snaps the interpolation cache instead of lerping across the jump
    #[serde(skip, default = "out_of_sync_default")]
    pub out_of_sync: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(BodyDef::default())
    }
}

impl RigidBody {
    /// Create a rigid body component from a definition
    pub fn new(def: BodyDef) -> Self {
        Self {
            def,
            handle: None,
            previous_position: Vec2::ZERO,
            previous_angle: 0.0,
            out_of_sync: true,
        }
    }

    /// Create a dynamic body component
    pub fn dynamic() -> Self {
        Self::new(BodyDef::new(BodyKind::Dynamic))
    }

    /// Create a kinematic body component
    pub fn kinematic() -> Self {
        Self::new(BodyDef::new(BodyKind::Kinematic))
    }

    /// Create a static body component
    pub fn fixed() -> Self {
        Self::new(BodyDef::new(BodyKind::Static))
    }

    /// Position to draw at, blending the previous and current step poses
    ///
    /// `alpha` is how far the render frame sits between two fixed steps,
    /// in `[0, 1]`.
    pub fn render_position(&self, transform: &Transform, alpha: f32) -> Vec2 {
        if self.out_of_sync {
            transform.position
        } else {
            self.previous_position.lerp(transform.position, alpha)
        }
    }

    /// Angle to draw at, blending the previous and current step poses
    pub fn render_angle(&self, transform: &Transform, alpha: f32) -> f32 {
        if self.out_of_sync {
            transform.rotation
        } else {
            self.previous_angle + (transform.rotation - self.previous_angle) * alpha
        }
    }
}

/// Collider component attaching a collision shape to an entity's body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collider {
    /// Definition the collider was (or will be) built from
    pub def: ColliderDef,
    /// Handle into the physics world, assigned by the physics system
    #[serde(skip)]
    pub handle: Option<ColliderHandle>,
}

impl Collider {
    /// Create a collider component from a definition
    pub fn new(def: ColliderDef) -> Self {
        Self { def, handle: None }
    }

    /// Box collider from half extents in pixels
    pub fn boxed(half_width: f32, half_height: f32) -> Self {
        Self::new(ColliderDef::new(ColliderShape::boxed(half_width, half_height)))
    }

    /// Circle collider centered on the body origin, radius in pixels
    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderDef::new(ColliderShape::circle(0.0, 0.0, radius)))
    }
}
