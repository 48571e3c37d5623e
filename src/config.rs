//! Configuration data model.
//!
//! Every field has a default so an empty file (or no file) is a valid
//! configuration.
//!
//! ```toml
//! resize_debounce_ms = 200
//! switch_duration_ms = 3000
//!
//! [pointer_history]
//! enabled = true
//! size = 20
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::DEFAULT_HISTORY_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingConfig {
    /// Quiet period before a viewport resize is delivered.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Duration given to switch effects registered without one.
    #[serde(default = "default_switch_duration_ms")]
    pub switch_duration_ms: u64,
    #[serde(default)]
    pub pointer_history: PointerHistoryConfig,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: default_resize_debounce_ms(),
            switch_duration_ms: default_switch_duration_ms(),
            pointer_history: PointerHistoryConfig::default(),
        }
    }
}

fn default_resize_debounce_ms() -> u64 {
    200
}

fn default_switch_duration_ms() -> u64 {
    3000
}

/// History recording of the global pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerHistoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_history_size")]
    pub size: usize,
}

impl Default for PointerHistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: default_history_size(),
        }
    }
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

impl LandingConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "resize_debounce_ms must be greater than zero".into(),
            ));
        }
        if self.pointer_history.size == 0 {
            return Err(ConfigError::Invalid(
                "pointer_history.size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn switch_duration(&self) -> Duration {
        Duration::from_millis(self.switch_duration_ms)
    }
}
