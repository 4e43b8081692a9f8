//! Asset path configuration

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors from asset path resolution and validation
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset names must be bare file stems, no separators or parent refs
    #[error("invalid asset name: {0}")]
    InvalidName(String),
    /// A configured asset directory does not exist
    #[error("asset directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// Where scripts and scenes live on disk
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Root directory for all assets
    pub asset_root: PathBuf,
    /// Directory name for scripts, relative to asset_root
    pub scripts_dir: String,
    /// Directory name for scenes, relative to asset_root
    pub scenes_dir: String,
}

impl AssetConfig {
    /// Create a new AssetConfig with custom paths
    pub fn new(asset_root: PathBuf, scripts_dir: String, scenes_dir: String) -> Self {
        debug!(
            asset_root = ?asset_root,
            scripts_dir = scripts_dir,
            scenes_dir = scenes_dir,
            "Creating new AssetConfig"
        );
        Self {
            asset_root,
            scripts_dir,
            scenes_dir,
        }
    }

    /// Resolve the file path for a script name
    ///
    /// Names come from `ScriptRef` components, possibly loaded from scene
    /// files, so anything that could escape the asset root is rejected.
    pub fn script_path(&self, name: &str) -> Result<PathBuf, AssetError> {
        check_name(name)?;
        Ok(self
            .asset_root
            .join(&self.scripts_dir)
            .join(format!("{name}.rhai")))
    }

    /// Resolve the file path for a scene name
    pub fn scene_path(&self, name: &str) -> Result<PathBuf, AssetError> {
        check_name(name)?;
        Ok(self
            .asset_root
            .join(&self.scenes_dir)
            .join(format!("{name}.json")))
    }

    /// Check that the configured asset directories exist
    pub fn validate(&self) -> Result<(), AssetError> {
        let dirs = [
            self.asset_root.clone(),
            self.asset_root.join(&self.scripts_dir),
            self.asset_root.join(&self.scenes_dir),
        ];
        for dir in dirs {
            if !dir.exists() {
                return Err(AssetError::MissingDirectory(dir));
            }
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), AssetError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AssetError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            scripts_dir: "scripts".to_string(),
            scenes_dir: "scenes".to_string(),
        }
    }
}
