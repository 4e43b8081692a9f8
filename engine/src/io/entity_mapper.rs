//! Mapping from scene-file entity IDs to live entities

use crate::core::entity::Entity;
use std::collections::HashMap;

/// Maps the entity IDs used in a scene file to freshly spawned entities
#[derive(Debug, Default)]
pub struct EntityMapper {
    map: HashMap<u64, Entity>,
}

impl EntityMapper {
    /// Create an empty mapper
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene ID for a spawned entity
    pub fn register(&mut self, scene_id: u64, entity: Entity) {
        self.map.insert(scene_id, entity);
    }

    /// Resolve a scene ID to its spawned entity
    pub fn resolve(&self, scene_id: u64) -> Option<Entity> {
        self.map.get(&scene_id).copied()
    }

    /// Number of mapped entities
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether any entities are mapped
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut world = hecs::World::new();
        let entity = world.spawn(());

        let mut mapper = EntityMapper::new();
        assert!(mapper.is_empty());

        mapper.register(3, entity);
        assert_eq!(mapper.resolve(3), Some(entity));
        assert_eq!(mapper.resolve(4), None);
        assert_eq!(mapper.len(), 1);
    }
}
