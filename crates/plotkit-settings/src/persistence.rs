//! Configuration persistence.
//!
//! One JSON file holds the whole configuration. Loading tolerates partial
//! files (missing sections fall back to defaults); saving always writes the
//! complete, pretty-printed document so the file stays hand-editable.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

/// Default configuration file name, looked up relative to the working
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = "plotkit.json";

impl Config {
    /// Load a configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
            }
        }
        fs::write(path, text)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Load the configuration, writing the defaults first if the file does
    /// not exist yet. Subsequent reads are stable either way.
    pub fn ensure_file(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to_file(path)?;
            info!(path = %path.display(), "default configuration written");
            return Ok(config);
        }
        Self::load_from_file(path)
    }
}
