//! Engine configuration.
//!
//! Values come from, in increasing priority: defaults, an optional JSON file,
//! the `HYDROGEN_PLUGIN_DIR` environment variable, and command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`EngineConfig::plugin_dir`].
pub const PLUGIN_DIR_ENV: &str = "HYDROGEN_PLUGIN_DIR";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`EngineConfig`].
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A rate is zero, negative, or not finite.
    #[error("{field} must be a positive number of hertz, got {value}")]
    InvalidRate {
        /// The offending field.
        field: &'static str,
        /// Its value.
        value: f64,
    },
}

/// Configuration for the frame loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target frames per second.
    pub tick_rate: f64,
    /// Fixed simulation steps per second.
    pub fixed_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_ticks: u64,
    /// Directory scanned for script plugins at startup.
    pub plugin_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            fixed_rate: 50.0,
            max_ticks: 0,
            plugin_dir: None,
        }
    }
}

impl EngineConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override the target frame rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Override the fixed simulation rate.
    #[must_use]
    pub fn with_fixed_rate(mut self, fixed_rate: f64) -> Self {
        self.fixed_rate = fixed_rate;
        self
    }

    /// Stop after `max_ticks` frames (0 = unlimited).
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Set the plugin directory.
    #[must_use]
    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    fn with_env_from(self, var: impl Fn(&str) -> Option<String>) -> Self {
        match var(PLUGIN_DIR_ENV).filter(|dir| !dir.is_empty()) {
            Some(dir) => self.with_plugin_dir(dir),
            None => self,
        }
    }

    /// Check that both rates are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] for a rate that is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("tick_rate", self.tick_rate), ("fixed_rate", self.fixed_rate)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }
        Ok(())
    }
}
