use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

fn default_log_filter() -> String {
    "info".to_string()
}

/// One playable asset, addressed by the id controllers pass in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Resource id (must be non-zero and unique)
    pub id: u32,

    /// Human-readable label for logs
    pub name: String,

    /// Audio file path, relative to the config directory unless absolute
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sounds the playback manager can be asked for
    #[serde(default)]
    pub assets: Vec<AssetEntry>,

    /// tracing filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets: vec![
                AssetEntry {
                    id: 10,
                    name: "Reading room ambience".to_string(),
                    path: "sounds/ambience.mp3".to_string(),
                },
                AssetEntry {
                    id: 20,
                    name: "Card table ambience".to_string(),
                    path: "sounds/card_table.mp3".to_string(),
                },
                AssetEntry {
                    id: 99,
                    name: "Card flip".to_string(),
                    path: "sounds/card_flip.mp3".to_string(),
                },
            ],
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from the app's config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create(&Self::config_path()?)
    }

    /// Load `path`, or write and return the default config if it is missing.
    ///
    /// Status goes to stdout: this runs before logging is set up.
    pub fn load_or_create(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let config = Self::load_from(config_path)?;
            println!("✓ Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            println!("✓ Created default config at: {}", config_path.display());
            println!("  Edit this file to add sounds.");
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the app's config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Reject zero ids, duplicate ids and empty paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.assets {
            if entry.id == 0 {
                return Err(ConfigError::Invalid(format!(
                    "asset '{}' has id 0",
                    entry.name
                )));
            }
            if !seen.insert(entry.id) {
                return Err(ConfigError::Invalid(format!(
                    "asset id {} is used more than once",
                    entry.id
                )));
            }
            if entry.path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "asset {} ('{}') has no path",
                    entry.id, entry.name
                )));
            }
        }
        Ok(())
    }

    /// Get the config file path (in app's base directory)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let exe_path = env::current_exe().map_err(|_| ConfigError::NoConfigDir)?;
        let exe_dir = exe_path.parent().ok_or(ConfigError::NoConfigDir)?;

        Ok(exe_dir.join("config").join("config.json"))
    }

    /// Directory asset paths are resolved against
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_path = Self::config_path()?;
        config_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or(ConfigError::NoConfigDir)
    }
}
