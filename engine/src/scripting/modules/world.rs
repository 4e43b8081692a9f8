//! World access API for rhai scripts
//!
//! Reads come from the per-frame component cache; writes go through the
//! script command queue and are applied once all scripts have run.

use crate::core::entity::Transform;
use crate::scripting::commands::{CommandQueue, ScriptCommand, SharedComponentCache};
use crate::scripting::modules::math::parse_vec2_from_dynamic;
use crate::stats::Movement;
use glam::Vec2;
use rhai::{Dynamic, EvalAltResult, Module};

/// Create the `world` module bound to this frame's queue and cache
pub fn create_world_module(queue: CommandQueue, cache: SharedComponentCache) -> Module {
    let mut module = Module::new();

    // --- Transform access ---

    let cache_ref = cache.clone();
    module.set_native_fn(
        "get_position",
        move |entity: i64| -> Result<Vec2, Box<EvalAltResult>> {
            let cache = cache_ref.read().unwrap();
            cache
                .transforms
                .get(&(entity as u64))
                .map(|t| t.position)
                .ok_or_else(|| format!("Entity {entity} has no Transform").into())
        },
    );

    let cache_ref = cache.clone();
    let queue_ref = queue.clone();
    module.set_native_fn(
        "set_position",
        move |entity: i64, position: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let position = parse_vec2_from_dynamic(position)?;
            let mut transform = {
                let cache = cache_ref.read().unwrap();
                cache
                    .transforms
                    .get(&(entity as u64))
                    .copied()
                    .unwrap_or_default()
            };
            transform.position = position;
            queue_ref.write().unwrap().push(ScriptCommand::SetTransform {
                entity: entity as u64,
                transform,
            });
            Ok(())
        },
    );

    let cache_ref = cache.clone();
    module.set_native_fn(
        "get_rotation",
        move |entity: i64| -> Result<f64, Box<EvalAltResult>> {
            let cache = cache_ref.read().unwrap();
            cache
                .transforms
                .get(&(entity as u64))
                .map(|t| t.rotation as f64)
                .ok_or_else(|| format!("Entity {entity} has no Transform").into())
        },
    );

    let cache_ref = cache.clone();
    let queue_ref = queue.clone();
    module.set_native_fn(
        "set_rotation",
        move |entity: i64, rotation: f64| -> Result<(), Box<EvalAltResult>> {
            let mut transform = {
                let cache = cache_ref.read().unwrap();
                cache
                    .transforms
                    .get(&(entity as u64))
                    .copied()
                    .unwrap_or_else(Transform::default)
            };
            transform.rotation = rotation as f32;
            queue_ref.write().unwrap().push(ScriptCommand::SetTransform {
                entity: entity as u64,
                transform,
            });
            Ok(())
        },
    );

    // --- Stats / Movement access ---

    let cache_ref = cache.clone();
    module.set_native_fn(
        "get_move_speed",
        move |entity: i64| -> Result<f64, Box<EvalAltResult>> {
            let cache = cache_ref.read().unwrap();
            cache
                .movements
                .get(&(entity as u64))
                .map(|m| m.speed as f64)
                .ok_or_else(|| format!("Entity {entity} has no Movement").into())
        },
    );

    let cache_ref = cache.clone();
    let queue_ref = queue.clone();
    module.set_native_fn(
        "set_base_speed",
        move |entity: i64, speed: f64| -> Result<(), Box<EvalAltResult>> {
            let mut stats = {
                let cache = cache_ref.read().unwrap();
                cache
                    .stats
                    .get(&(entity as u64))
                    .copied()
                    .ok_or_else(|| -> Box<EvalAltResult> {
                        format!("Entity {entity} has no Stats").into()
                    })?
            };
            stats.move_speed = speed as f32;
            queue_ref.write().unwrap().push(ScriptCommand::SetStats {
                entity: entity as u64,
                stats,
            });
            Ok(())
        },
    );

    // Stat sync overwrites this next tick for entities carrying Stats;
    // use set_base_speed for those
    let queue_ref = queue.clone();
    module.set_native_fn(
        "set_movement",
        move |entity: i64, speed: f64, sprint_speed: f64| -> Result<(), Box<EvalAltResult>> {
            queue_ref.write().unwrap().push(ScriptCommand::SetMovement {
                entity: entity as u64,
                movement: Movement {
                    speed: speed as f32,
                    sprint_speed: sprint_speed as f32,
                },
            });
            Ok(())
        },
    );

    // --- Entity management ---

    let queue_ref = queue.clone();
    module.set_native_fn(
        "spawn",
        move |name: &str, position: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let position = parse_vec2_from_dynamic(position)?;
            queue_ref.write().unwrap().push(ScriptCommand::Spawn {
                name: name.to_string(),
                transform: Transform::from_position(position),
            });
            Ok(())
        },
    );

    let cache_ref = cache.clone();
    module.set_native_fn(
        "get_name",
        move |entity: i64| -> Result<String, Box<EvalAltResult>> {
            let cache = cache_ref.read().unwrap();
            Ok(cache
                .names
                .get(&(entity as u64))
                .cloned()
                .unwrap_or_default())
        },
    );

    let queue_ref = queue.clone();
    module.set_native_fn(
        "despawn",
        move |entity: i64| -> Result<(), Box<EvalAltResult>> {
            queue_ref.write().unwrap().push(ScriptCommand::DestroyEntity {
                entity: entity as u64,
            });
            Ok(())
        },
    );

    module
}
