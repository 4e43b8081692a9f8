//! Scene serialization and the component registry

pub mod component_registry;
pub mod entity_mapper;
pub mod scene;

pub use component_registry::ComponentRegistry;
pub use entity_mapper::EntityMapper;
pub use scene::{Scene, SceneError, SerializedEntity};
