//! Scene serialization and loading

use crate::core::entity::{Name, Transform, World};
use crate::io::component_registry::ComponentRegistry;
use crate::io::entity_mapper::EntityMapper;
use crate::physics::{Collider, RigidBody};
use crate::scripting::ScriptRef;
use crate::stats::{Movement, Stats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};

/// Scene data structure containing serialized entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// List of serialized entities with their components
    pub entities: Vec<SerializedEntity>,
}

/// A single serialized entity with its components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedEntity {
    /// Map of component type names to their serialized JSON values
    pub components: HashMap<String, serde_json::Value>,
}

/// Errors that can occur during scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    /// IO error when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A scene file referenced a component the registry does not know
    #[error("unknown component type: {0}")]
    UnknownComponent(String),
    /// Component deserialization error
    #[error("component error: {0}")]
    Component(String),
}

macro_rules! serialize_component {
    ($world:expr, $entity:expr, $components:expr, $ty:ty, $name:literal) => {
        if let Ok(component) = $world.get::<$ty>($entity) {
            match serde_json::to_value(&*component) {
                Ok(value) => {
                    $components.insert($name.to_string(), value);
                }
                Err(e) => {
                    error!(error = %e, concat!("Failed to serialize ", $name));
                }
            }
        }
    };
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene from a world, capturing all entities and their components
    pub fn from_world(world: &World) -> Self {
        let mut entities = Vec::new();

        for (entity, ()) in world.query::<()>().iter() {
            let mut components = HashMap::new();

            serialize_component!(world, entity, components, Transform, "Transform");
            serialize_component!(world, entity, components, Name, "Name");
            serialize_component!(world, entity, components, RigidBody, "RigidBody");
            serialize_component!(world, entity, components, Collider, "Collider");
            serialize_component!(world, entity, components, Stats, "Stats");
            serialize_component!(world, entity, components, Movement, "Movement");
            serialize_component!(world, entity, components, ScriptRef, "ScriptRef");

            entities.push(SerializedEntity { components });
        }

        info!(entity_count = entities.len(), "Created scene from world");

        Scene { entities }
    }

    /// Instantiate this scene into a world, returning an entity mapper
    pub fn instantiate(&self, world: &mut World) -> Result<EntityMapper, SceneError> {
        let registry = ComponentRegistry::with_default_components();
        let mut mapper = EntityMapper::new();

        info!(entity_count = self.entities.len(), "Instantiating scene");

        for (id, serialized_entity) in self.entities.iter().enumerate() {
            let entity = world.spawn(());
            mapper.register(id as u64, entity);

            for (type_name, value) in &serialized_entity.components {
                if !registry.is_registered(type_name) {
                    return Err(SceneError::UnknownComponent(type_name.clone()));
                }

                let insert_result = match type_name.as_str() {
                    "Transform" => insert_typed::<Transform>(world, entity, value),
                    "Name" => insert_typed::<Name>(world, entity, value),
                    "RigidBody" => insert_typed::<RigidBody>(world, entity, value),
                    "Collider" => insert_typed::<Collider>(world, entity, value),
                    "Stats" => insert_typed::<Stats>(world, entity, value),
                    "Movement" => insert_typed::<Movement>(world, entity, value),
                    "ScriptRef" => insert_typed::<ScriptRef>(world, entity, value),
                    other => Err(SceneError::UnknownComponent(other.to_string())),
                };
                insert_result?;
            }

            debug!(id = id, entity = ?entity, "Instantiated entity");
        }

        Ok(mapper)
    }

    /// Save this scene to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!(path = ?path.as_ref(), "Saved scene");
        Ok(())
    }

    /// Load a scene from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let json = fs::read_to_string(&path)?;
        let scene: Scene = serde_json::from_str(&json)?;
        info!(
            path = ?path.as_ref(),
            entity_count = scene.entities.len(),
            "Loaded scene"
        );
        Ok(scene)
    }
}

fn insert_typed<T>(
    world: &mut World,
    entity: hecs::Entity,
    value: &serde_json::Value,
) -> Result<(), SceneError>
where
    T: hecs::Component + serde::de::DeserializeOwned,
{
    let component: T = serde_json::from_value(value.clone())
        .map_err(|e| SceneError::Component(e.to_string()))?;
    world
        .insert_one(entity, component)
        .map_err(|e| SceneError::Component(format!("{e:?}")))?;
    Ok(())
}
