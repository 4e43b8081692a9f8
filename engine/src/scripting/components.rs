//! Script-related components

use serde::{Deserialize, Serialize};

/// Reference to a script asset
///
/// Attach this to an entity to give it scripted behavior. The script is
/// resolved through `AssetConfig` with a `.rhai` extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct ScriptRef {
    /// Script name without extension (e.g., "bouncer")
    pub name: String,
}

impl ScriptRef {
    /// Create a new script reference
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_ref_new() {
        let script_ref = ScriptRef::new("bouncer");
        assert_eq!(script_ref.name, "bouncer");
    }

    #[test]
    fn test_script_ref_serialization() {
        let script_ref = ScriptRef::new("bouncer");
        let json = serde_json::to_string(&script_ref).unwrap();
        assert_eq!(json, r#"{"name":"bouncer"}"#);

        let deserialized: ScriptRef = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, script_ref);
    }
}
