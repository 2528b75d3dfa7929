//! Logging middleware configuration
//!
//! Loaded from `.redux-store.toml`:
//!
//! ```toml
//! level = "info"
//! log_state = true
//! ignored_actions = ["my_app::Tick"]
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

const CONFIG_FILE: &str = ".redux-store.toml";

/// Configuration for [`crate::middleware::logging::LoggingMiddleware`]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level actions are logged at
    #[serde(default = "default_level")]
    pub level: log::Level,

    /// Also log the state after each action (requires `S: Debug`)
    #[serde(default)]
    pub log_state: bool,

    /// Action type names that are forwarded without logging
    #[serde(default)]
    pub ignored_actions: Vec<String>,
}

fn default_level() -> log::Level {
    log::Level::Debug
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_state: false,
            ignored_actions: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        for path in config_candidates() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    log::info!("Loaded logging config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default logging config");
        Self::default()
    }

    /// Returns true if actions of this type should not be logged
    pub fn is_ignored(&self, type_name: &str) -> bool {
        self.ignored_actions.iter().any(|ignored| ignored == type_name)
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    candidates
}
