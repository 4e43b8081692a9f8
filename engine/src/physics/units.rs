//! Unit conversion between game pixels and physics meters
//!
//! rapier works in SI units, gameplay code works in pixels. All conversion
//! goes through this module so the scale factor lives in exactly one place.

use glam::Vec2;
use rapier2d::math::{Point, Real, Vector};

/// Number of game pixels per physics meter
pub const PIXELS_PER_METER: f32 = 32.0;

/// Convert a pixel-space vector to a physics-space vector
pub fn to_physics(v: Vec2) -> Vector<Real> {
    Vector::new(v.x / PIXELS_PER_METER, v.y / PIXELS_PER_METER)
}

/// Convert a pixel-space vector to a physics-space point
pub fn to_physics_point(v: Vec2) -> Point<Real> {
    Point::new(v.x / PIXELS_PER_METER, v.y / PIXELS_PER_METER)
}

/// Convert a physics-space vector back to pixels
pub fn to_pixels(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x * PIXELS_PER_METER, v.y * PIXELS_PER_METER)
}

/// Convert a scalar length from pixels to meters
pub fn to_physics_scalar(v: f32) -> f32 {
    v / PIXELS_PER_METER
}

/// Convert a scalar length from meters to pixels
pub fn to_pixels_scalar(v: f32) -> f32 {
    v * PIXELS_PER_METER
}
