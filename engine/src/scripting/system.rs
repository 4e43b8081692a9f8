//! Script execution system

use crate::core::entity::{Entity, World};
use crate::scripting::commands::{CommandQueue, ScriptCommand, SharedComponentCache};
use crate::scripting::modules::world::create_world_module;
use crate::scripting::{ScriptEngine, ScriptRef};
use rhai::Scope;
use std::collections::HashMap;
use tracing::{debug, error, warn};

thread_local! {
    // Entities whose on_start has run, with the script that ran it
    static TRACKER: std::cell::RefCell<HashMap<Entity, String>> =
        std::cell::RefCell::new(HashMap::new());
    static COMMAND_QUEUE: CommandQueue = CommandQueue::default();
    static COMPONENT_CACHE: SharedComponentCache = SharedComponentCache::default();
}

/// Run scripts on all entities with a ScriptRef component
///
/// Calls `on_start` once per entity, `on_update` every frame, and
/// `on_destroy` when the entity or its script reference goes away.
/// World mutations issued by scripts are applied after all scripts ran.
pub fn script_execution_system(
    world: &mut World,
    script_engine: &mut ScriptEngine,
    delta_time: f32,
) {
    let command_queue = COMMAND_QUEUE.with(|q| q.clone());
    let component_cache = COMPONENT_CACHE.with(|c| c.clone());

    // Clear commands from the previous frame and snapshot the world
    command_queue.write().unwrap().clear();
    component_cache.write().unwrap().capture(world.inner());

    // Rebind the world module to this frame's queue and cache; the
    // stateless physics module was registered at engine construction
    if let Some(engine) = script_engine.engine_mut() {
        engine.register_static_module(
            "world",
            create_world_module(command_queue.clone(), component_cache.clone()).into(),
        );
    } else {
        warn!("Cannot get mutable access to script engine; skipping script frame");
        return;
    }

    // Collect entities with scripts first to avoid borrow conflicts
    let mut entities_with_scripts = Vec::new();
    for (entity, script_ref) in world.query::<&ScriptRef>().iter() {
        entities_with_scripts.push((entity, script_ref.clone()));
    }

    run_destroy_hooks(world, script_engine, &entities_with_scripts);

    debug!(
        count = entities_with_scripts.len(),
        "Executing scripts on entities"
    );

    for (entity, script_ref) in entities_with_scripts {
        if !script_engine.is_loaded(&script_ref.name) {
            if let Err(e) = script_engine.load_script_by_name(&script_ref.name) {
                error!(script = script_ref.name, error = %e, "Failed to load script");
                continue;
            }
        }

        let entity_id = entity.to_bits().get();
        let mut scope = Scope::new();
        scope.push("entity", entity_id as i64);

        let started = TRACKER.with(|t| t.borrow().contains_key(&entity));
        if !started {
            if let Err(e) = script_engine.call_on_start(&script_ref.name, entity_id, &mut scope) {
                error!(script = script_ref.name, entity = entity_id, error = %e, "on_start failed");
            }
            TRACKER.with(|t| {
                t.borrow_mut().insert(entity, script_ref.name.clone());
            });
        }

        if let Err(e) =
            script_engine.call_on_update(&script_ref.name, entity_id, &mut scope, delta_time)
        {
            error!(script = script_ref.name, entity = entity_id, error = %e, "on_update failed");
        }
    }

    apply_script_commands(world, &command_queue);
}

/// Call on_destroy for entities that lost their script since last frame
fn run_destroy_hooks(
    world: &World,
    script_engine: &ScriptEngine,
    current: &[(Entity, ScriptRef)],
) {
    let removed: Vec<(Entity, String)> = TRACKER.with(|t| {
        t.borrow()
            .iter()
            .filter(|(entity, _)| {
                !world.contains(**entity) || !current.iter().any(|(e, _)| e == *entity)
            })
            .map(|(entity, name)| (*entity, name.clone()))
            .collect()
    });

    for (entity, script_name) in removed {
        let entity_id = entity.to_bits().get();
        let mut scope = Scope::new();
        scope.push("entity", entity_id as i64);
        if let Err(e) = script_engine.call_on_destroy(&script_name, entity_id, &mut scope) {
            error!(script = script_name, entity = entity_id, error = %e, "on_destroy failed");
        }
        debug!(script = script_name, entity = entity_id, "Script entity destroyed");
        TRACKER.with(|t| {
            t.borrow_mut().remove(&entity);
        });
    }
}

/// Apply all queued script commands to the world
fn apply_script_commands(world: &mut World, queue: &CommandQueue) {
    let commands: Vec<ScriptCommand> = queue.write().unwrap().drain(..).collect();
    for command in commands {
        if let Err(e) = command.apply(world.inner_mut()) {
            error!(error = %e, "Failed to apply script command");
        }
    }
}
