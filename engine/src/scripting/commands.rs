//! Script command buffer and component cache
//!
//! Scripts read component data from a per-frame snapshot and write through
//! a command queue that is applied after all scripts have run, so they
//! never hold borrows into the live world.

use crate::core::entity::{Entity, Name, Transform};
use crate::stats::{Movement, Stats};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error};

/// Deferred world mutation issued by a script
#[derive(Clone, Debug)]
pub enum ScriptCommand {
    Spawn { name: String, transform: Transform },
    SetTransform { entity: u64, transform: Transform },
    SetStats { entity: u64, stats: Stats },
    SetMovement { entity: u64, movement: Movement },
    DestroyEntity { entity: u64 },
}

/// Shared queue of script commands
pub type CommandQueue = Arc<RwLock<Vec<ScriptCommand>>>;

/// Snapshot of component data scripts are allowed to read
#[derive(Clone, Default)]
pub struct ComponentCache {
    pub transforms: HashMap<u64, Transform>,
    pub stats: HashMap<u64, Stats>,
    pub movements: HashMap<u64, Movement>,
    pub names: HashMap<u64, String>,
}

/// Shared, thread-safe component cache
pub type SharedComponentCache = Arc<RwLock<ComponentCache>>;

impl ComponentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all cached data
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.stats.clear();
        self.movements.clear();
        self.names.clear();
    }

    /// Rebuild the snapshot from the current world state
    pub fn capture(&mut self, world: &hecs::World) {
        self.clear();

        for (entity, transform) in world.query::<&Transform>().iter() {
            self.transforms.insert(entity.to_bits().get(), *transform);
        }
        for (entity, stats) in world.query::<&Stats>().iter() {
            self.stats.insert(entity.to_bits().get(), *stats);
        }
        for (entity, movement) in world.query::<&Movement>().iter() {
            self.movements.insert(entity.to_bits().get(), *movement);
        }
        for (entity, name) in world.query::<&Name>().iter() {
            self.names.insert(entity.to_bits().get(), name.0.clone());
        }
    }
}

impl ScriptCommand {
    /// Apply this command to the world
    pub fn apply(&self, world: &mut hecs::World) -> Result<(), String> {
        match self {
            ScriptCommand::Spawn { name, transform } => {
                let entity = world.spawn((Name::new(name.clone()), *transform));
                debug!(name = %name, entity = ?entity, "Spawned entity from script");
                Ok(())
            }
            ScriptCommand::SetTransform { entity, transform } => {
                insert_checked(world, *entity, *transform, "transform")
            }
            ScriptCommand::SetStats { entity, stats } => {
                insert_checked(world, *entity, *stats, "stats")
            }
            ScriptCommand::SetMovement { entity, movement } => {
                insert_checked(world, *entity, *movement, "movement")
            }
            ScriptCommand::DestroyEntity { entity } => {
                let Some(ent) = Entity::from_bits(*entity) else {
                    error!(entity = *entity, "Invalid entity ID");
                    return Err(format!("Invalid entity ID: {entity}"));
                };
                if !world.contains(ent) {
                    error!(entity = *entity, "Entity not found for destruction");
                    return Err(format!("Entity {entity} not found"));
                }
                world
                    .despawn(ent)
                    .map_err(|e| format!("Failed to destroy entity: {e:?}"))?;
                debug!(entity = *entity, "Destroyed entity from script");
                Ok(())
            }
        }
    }
}

fn insert_checked(
    world: &mut hecs::World,
    entity: u64,
    component: impl hecs::Component,
    what: &str,
) -> Result<(), String> {
    let Some(ent) = Entity::from_bits(entity) else {
        error!(entity = entity, "Invalid entity ID");
        return Err(format!("Invalid entity ID: {entity}"));
    };
    if !world.contains(ent) {
        error!(entity = entity, what = what, "Entity not found for update");
        return Err(format!("Entity {entity} not found"));
    }
    world
        .insert_one(ent, component)
        .map_err(|e| format!("Failed to insert {what}: {e:?}"))?;
    debug!(entity = entity, what = what, "Applied update from script");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_command_queue_thread_safety() {
        let queue = CommandQueue::default();
        let q1 = queue.clone();

        std::thread::spawn(move || {
            q1.write().unwrap().push(ScriptCommand::SetTransform {
                entity: 1,
                transform: Transform::default(),
            });
        })
        .join()
        .unwrap();

        assert_eq!(queue.read().unwrap().len(), 1);
    }

    #[test]
    fn test_cache_capture() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Transform::from_position(Vec2::new(3.0, 4.0)),
            Stats::default(),
            Name::new("hero"),
        ));
        let id = entity.to_bits().get();

        let mut cache = ComponentCache::new();
        cache.capture(&world);

        assert_eq!(cache.transforms[&id].position, Vec2::new(3.0, 4.0));
        assert_eq!(cache.stats[&id], Stats::default());
        assert_eq!(cache.names[&id], "hero");
        assert!(cache.movements.is_empty());
    }

    #[test]
    fn test_set_transform_command() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::default(),));
        let id = entity.to_bits().get();

        let command = ScriptCommand::SetTransform {
            entity: id,
            transform: Transform::from_position(Vec2::new(10.0, 20.0)),
        };
        command.apply(&mut world).unwrap();

        let transform = world.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_spawn_command_creates_named_entity() {
        let mut world = hecs::World::new();

        ScriptCommand::Spawn {
            name: "child".to_string(),
            transform: Transform::from_position(Vec2::new(8.0, 0.0)),
        }
        .apply(&mut world)
        .unwrap();

        let mut found = false;
        for (_, (name, transform)) in world.query::<(&Name, &Transform)>().iter() {
            assert_eq!(name.0, "child");
            assert_eq!(transform.position, Vec2::new(8.0, 0.0));
            found = true;
        }
        assert!(found);
    }

    #[test]
    fn test_commands_on_missing_entity_error() {
        let mut world = hecs::World::new();

        let command = ScriptCommand::SetMovement {
            entity: 9999,
            movement: Movement::default(),
        };
        assert!(command.apply(&mut world).is_err());

        let destroy = ScriptCommand::DestroyEntity { entity: 9999 };
        assert!(destroy.apply(&mut world).is_err());
    }
}
