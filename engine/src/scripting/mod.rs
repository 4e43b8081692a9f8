//! Scripting system using rhai
//!
//! Entities carry a `ScriptRef` component naming a `.rhai` script with
//! lifecycle functions (on_start, on_update, on_destroy). Scripts reach
//! the engine through the `world` and `physics` modules; all mutation is
//! deferred through command queues.

pub mod commands;
pub mod components;
pub mod engine;
pub mod modules;
pub mod system;

pub use components::ScriptRef;
pub use engine::ScriptEngine;
pub use system::script_execution_system;

// Re-export commonly used types
pub use rhai::{Dynamic, EvalAltResult};

// Command system types
pub use commands::{CommandQueue, ComponentCache, ScriptCommand, SharedComponentCache};
