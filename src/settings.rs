//! Registry settings and their on-disk JSON form

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default settings location relative to the project root
pub const DEFAULT_SETTINGS_PATH: &str = "ProjectSettings/ReferenceablesSettings.json";

/// Behaviour switches for the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Emit informational messages
    pub log_messages: bool,
    /// Emit warnings
    pub log_warnings: bool,
    /// Emit errors
    pub log_errors: bool,
    /// Silently accept repeated identifiers instead of tracking them
    pub allow_duplicates: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            log_messages: true,
            log_warnings: true,
            log_errors: true,
            allow_duplicates: false,
        }
    }
}

impl RegistrySettings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&json)?)
    }

    /// Read settings, falling back to defaults when the file is absent or corrupt
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| {
            RegistryError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}
