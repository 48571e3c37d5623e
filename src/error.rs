//! Error types.
//!
//! Lifecycle operations never fail. Errors only exist where a caller may
//! want to know why a request was refused: navigation, frame registration,
//! capability lookups and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Direction;

/// Why a frame switch did not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("a frame switch is already in progress")]
    SwitchInProgress,
    #[error("no active frame")]
    NoActiveFrame,
    #[error("unknown frame `{0}`")]
    UnknownFrame(String),
    #[error("frame `{from}` declares no registered {direction} frame")]
    UnresolvedAdjacency { from: String, direction: Direction },
    #[error("frame `{0}` is already active")]
    AlreadyActive(String),
    #[error("no switch effects registered")]
    NoSwitchEffects,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame `{0}` is already registered")]
    Duplicate(String),
    #[error("`{entity}` has no {capability} capability")]
    MissingCapability {
        entity: String,
        capability: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
