//! Component registry for dynamic component deserialization

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A function that can deserialize a component from a JSON value
pub type ComponentDeserializerFn = Arc<
    dyn Fn(&serde_json::Value) -> Result<Box<dyn Any>, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// Registry mapping component type names to serde deserializers
///
/// Registering a component here is what makes it loadable from scene
/// files; unknown names are rejected at load time.
#[derive(Default)]
pub struct ComponentRegistry {
    deserializers: HashMap<String, ComponentDeserializerFn>,
}

impl ComponentRegistry {
    /// Create a new empty component registry
    pub fn new() -> Self {
        Self {
            deserializers: HashMap::new(),
        }
    }

    /// Register a component deserializer under a type name
    pub fn register<T: 'static + serde::de::DeserializeOwned>(&mut self, type_name: &str) {
        let deserializer: ComponentDeserializerFn = Arc::new(move |value| {
            let component: T = serde_json::from_value(value.clone())?;
            Ok(Box::new(component))
        });

        self.deserializers
            .insert(type_name.to_string(), deserializer);
        debug!(type_name = type_name, "Registered component deserializer");
    }

    /// Deserialize a component from a JSON value
    pub fn deserialize_component(
        &self,
        type_name: &str,
        value: &serde_json::Value,
    ) -> Result<Box<dyn Any>, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(deserializer) = self.deserializers.get(type_name) {
            deserializer(value)
        } else {
            Err(format!("Unknown component type: {type_name}").into())
        }
    }

    /// Check if a component type is registered
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.deserializers.contains_key(type_name)
    }

    /// Get all registered component type names
    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.deserializers.keys().map(|s| s.as_str())
    }

    /// Number of registered component types
    pub fn len(&self) -> usize {
        self.deserializers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.deserializers.is_empty()
    }

    /// Create a registry with all built-in engine components registered
    pub fn with_default_components() -> Self {
        use crate::core::entity::{Name, Transform};
        use crate::physics::{Collider, RigidBody};
        use crate::scripting::ScriptRef;
        use crate::stats::{Movement, Stats};

        let mut registry = Self::new();

        registry.register::<Transform>("Transform");
        registry.register::<Name>("Name");
        registry.register::<RigidBody>("RigidBody");
        registry.register::<Collider>("Collider");
        registry.register::<Stats>("Stats");
        registry.register::<Movement>("Movement");
        registry.register::<ScriptRef>("ScriptRef");

        debug!(
            component_count = registry.len(),
            "Created registry with default components"
        );

        registry
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field(
                "registered_types",
                &self.deserializers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestComponent {
        value: i32,
    }

    #[test]
    fn test_component_registry_basic() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.is_empty());

        registry.register::<TestComponent>("TestComponent");
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("TestComponent"));
        assert!(!registry.is_registered("UnknownComponent"));
    }

    #[test]
    fn test_component_registry_deserialize() {
        let mut registry = ComponentRegistry::new();
        registry.register::<TestComponent>("TestComponent");

        let json_value = serde_json::json!({ "value": 42 });
        let component = registry
            .deserialize_component("TestComponent", &json_value)
            .unwrap();
        let test_component = component.downcast_ref::<TestComponent>().unwrap();
        assert_eq!(test_component.value, 42);
    }

    #[test]
    fn test_component_registry_unknown_type() {
        let registry = ComponentRegistry::new();
        let result = registry.deserialize_component("UnknownType", &serde_json::json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_component_registry_default() {
        let registry = ComponentRegistry::with_default_components();
        assert!(registry.is_registered("Transform"));
        assert!(registry.is_registered("Name"));
        assert!(registry.is_registered("RigidBody"));
        assert!(registry.is_registered("Collider"));
        assert!(registry.is_registered("Stats"));
        assert!(registry.is_registered("Movement"));
        assert!(registry.is_registered("ScriptRef"));
    }
}
