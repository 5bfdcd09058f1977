// Settings
// Loaded from ~/.config/gsheet/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error reading or writing the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the spreadsheets feeds
    pub feeds_base: String,
    /// ClientLogin endpoint
    pub login_url: String,
    /// Application name reported at login
    pub source: String,
    /// HTTP timeout per request
    pub timeout_secs: u64,
    /// Account used when none is given on the command line or in the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_email: Option<String>,
    /// Open sheets read-only unless told otherwise
    pub readonly: bool,
    /// Buffer row edits until an explicit save
    pub deferred_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds_base: "https://spreadsheets.google.com/feeds".to_string(),
            login_url: "https://www.google.com/accounts/ClientLogin".to_string(),
            source: concat!("gsheet-", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 60,
            default_email: None,
            readonly: false,
            deferred_save: false,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gsheet");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults.
    ///
    /// A missing file is normal; a broken one is logged and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path. Errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: parent.to_path_buf(), source })?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

        fs::write(path, json)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }
}
