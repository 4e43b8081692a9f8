//! Script-facing API modules

pub mod math;
pub mod physics;
pub mod world;
