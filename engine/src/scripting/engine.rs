//! Rhai engine wrapper with script caching

use crate::config::AssetConfig;
use rhai::{Engine, EvalAltResult, Scope, AST};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Cached script data
#[derive(Clone)]
struct CachedScript {
    ast: AST,
    has_on_start: bool,
    has_on_update: bool,
    has_on_destroy: bool,
}

/// Script engine with caching
pub struct ScriptEngine {
    /// The rhai engine instance
    pub engine: Arc<Engine>,
    /// Cache of compiled scripts
    cache: Arc<RwLock<HashMap<String, CachedScript>>>,
    /// Asset configuration for loading scripts
    asset_config: AssetConfig,
}

impl ScriptEngine {
    /// Create a new script engine with default asset configuration
    pub fn new() -> Self {
        Self::with_config(AssetConfig::default())
    }

    /// Create a new script engine with custom asset configuration
    pub fn with_config(asset_config: AssetConfig) -> Self {
        let mut engine = Engine::new();

        // Configure engine for safety
        engine.set_max_expr_depths(100, 100);
        engine.set_max_call_levels(50);
        engine.set_max_operations(100_000);
        engine.set_max_string_size(10_000);
        engine.set_max_array_size(10_000);
        engine.set_max_map_size(1_000);
        engine.disable_symbol("eval");

        // Engine-global types available to every script
        crate::scripting::modules::math::register_math_api(&mut engine);
        crate::scripting::modules::physics::register_physics_api(&mut engine);

        // The physics module is stateless (it queues onto a thread-local),
        // so it is registered once here; only the world module is rebound
        // per frame
        engine.register_static_module(
            "physics",
            crate::scripting::modules::physics::create_physics_module().into(),
        );

        Self {
            engine: Arc::new(engine),
            cache: Arc::new(RwLock::new(HashMap::new())),
            asset_config,
        }
    }

    /// Get a mutable reference to the engine for module registration
    ///
    /// Only works while no clones of the inner engine exist.
    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        Arc::get_mut(&mut self.engine)
    }

    /// Load and compile a script by name using the configured asset path
    pub fn load_script_by_name(&self, script_name: &str) -> Result<(), Box<EvalAltResult>> {
        let script_path = self
            .asset_config
            .script_path(script_name)
            .map_err(|e| -> Box<EvalAltResult> { e.to_string().into() })?;
        self.load_script(script_name, &script_path.to_string_lossy())
    }

    /// Load and compile a script from a file path
    pub fn load_script(
        &self,
        script_name: &str,
        script_path: &str,
    ) -> Result<(), Box<EvalAltResult>> {
        debug!(
            script_name = script_name,
            path = script_path,
            "Loading script"
        );

        // Check cache first
        {
            let cache = self.cache.read().unwrap();
            if cache.contains_key(script_name) {
                debug!(script_name = script_name, "Script already cached");
                return Ok(());
            }
        }

        let script_content = std::fs::read_to_string(script_path)
            .map_err(|e| format!("Failed to read script file '{script_path}': {e}"))?;

        let ast = self.engine.compile(&script_content).map_err(|e| {
            let position = e.position();
            format!(
                "{}:{}:{} - {}",
                script_path,
                position.line().unwrap_or(0),
                position.position().unwrap_or(0),
                e
            )
        })?;

        let has_fn = |name: &str| ast.iter_functions().any(|f| f.name == name);
        let cached_script = CachedScript {
            has_on_start: has_fn("on_start"),
            has_on_update: has_fn("on_update"),
            has_on_destroy: has_fn("on_destroy"),
            ast,
        };

        debug!(
            script_name = script_name,
            has_on_start = cached_script.has_on_start,
            has_on_update = cached_script.has_on_update,
            has_on_destroy = cached_script.has_on_destroy,
            "Script lifecycle functions detected"
        );

        self.cache
            .write()
            .unwrap()
            .insert(script_name.to_string(), cached_script);

        Ok(())
    }

    fn call_lifecycle_fn(
        &self,
        script_name: &str,
        fn_name: &str,
        scope: &mut Scope,
        args: impl rhai::FuncArgs,
    ) -> Result<(), Box<EvalAltResult>> {
        let cached = {
            let cache = self.cache.read().unwrap();
            cache.get(script_name).cloned()
        };
        if let Some(cached) = cached {
            self.engine
                .call_fn::<()>(scope, &cached.ast, fn_name, args)
                .map_err(|e| -> Box<EvalAltResult> {
                    let position = e.position();
                    Box::new(
                        format!(
                            "{}:{}:{} - {}",
                            script_name,
                            position.line().unwrap_or(0),
                            position.position().unwrap_or(0),
                            e
                        )
                        .into(),
                    )
                })?;
        }
        Ok(())
    }

    /// Call the on_start lifecycle function
    pub fn call_on_start(
        &self,
        script_name: &str,
        entity_id: u64,
        scope: &mut Scope,
    ) -> Result<(), Box<EvalAltResult>> {
        if !self.has_lifecycle_fn(script_name, |c| c.has_on_start) {
            return Ok(());
        }
        self.call_lifecycle_fn(script_name, "on_start", scope, (entity_id as i64,))
    }

    /// Call the on_update lifecycle function
    pub fn call_on_update(
        &self,
        script_name: &str,
        entity_id: u64,
        scope: &mut Scope,
        delta_time: f32,
    ) -> Result<(), Box<EvalAltResult>> {
        if !self.has_lifecycle_fn(script_name, |c| c.has_on_update) {
            return Ok(());
        }
        self.call_lifecycle_fn(
            script_name,
            "on_update",
            scope,
            (entity_id as i64, delta_time as f64),
        )
    }

    /// Call the on_destroy lifecycle function
    pub fn call_on_destroy(
        &self,
        script_name: &str,
        entity_id: u64,
        scope: &mut Scope,
    ) -> Result<(), Box<EvalAltResult>> {
        if !self.has_lifecycle_fn(script_name, |c| c.has_on_destroy) {
            return Ok(());
        }
        self.call_lifecycle_fn(script_name, "on_destroy", scope, (entity_id as i64,))
    }

    fn has_lifecycle_fn(&self, script_name: &str, check: impl Fn(&CachedScript) -> bool) -> bool {
        self.cache
            .read()
            .unwrap()
            .get(script_name)
            .map(check)
            .unwrap_or(false)
    }

    /// Check if a script is loaded in the cache
    pub fn is_loaded(&self, script_name: &str) -> bool {
        self.cache.read().unwrap().contains_key(script_name)
    }

    /// Clear the script cache
    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Get the number of cached scripts
    pub fn cache_size(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_script_engine_creation() {
        let engine = ScriptEngine::new();
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn test_script_loading_and_lifecycle_detection() {
        let engine = ScriptEngine::new();

        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("mover.rhai");
        fs::write(
            &script_path,
            r#"
            fn on_start(entity) {
                print("started " + entity);
            }

            fn on_update(entity, delta_time) {
                print("update " + entity);
            }
        "#,
        )
        .unwrap();

        engine
            .load_script("mover", &script_path.to_string_lossy())
            .unwrap();
        assert!(engine.is_loaded("mover"));
        assert_eq!(engine.cache_size(), 1);

        // on_destroy is absent: calling it is a silent no-op
        let mut scope = Scope::new();
        engine.call_on_destroy("mover", 1, &mut scope).unwrap();
    }

    #[test]
    fn test_suspect_script_name_is_an_error() {
        let engine = ScriptEngine::new();
        let result = engine.load_script_by_name("../evil");
        assert!(result.is_err());
        assert!(!engine.is_loaded("../evil"));
    }

    #[test]
    fn test_physics_module_registered_at_construction() {
        let _ = crate::physics::commands::drain_physics_commands();

        let engine = ScriptEngine::new();
        engine
            .engine
            .run("physics::warp_to(1, vec2(0.0, 0.0))")
            .unwrap();

        let commands = crate::physics::commands::drain_physics_commands();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_missing_script_file_errors() {
        let engine = ScriptEngine::new();
        assert!(engine.load_script("missing", "no/such/file.rhai").is_err());
        assert!(!engine.is_loaded("missing"));
    }

    #[test]
    fn test_compile_error_reported() {
        let engine = ScriptEngine::new();

        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("broken.rhai");
        fs::write(&script_path, "fn on_start(entity) { let = ; }").unwrap();

        let result = engine.load_script("broken", &script_path.to_string_lossy());
        assert!(result.is_err());
    }
}
