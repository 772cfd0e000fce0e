//! Core error types for stretchcat-core.
//!
//! The timer and the policy never fail: a disallowed transition is a no-op
//! and a degenerate configuration is evaluated literally. Errors only come
//! from the collaborators around the core (settings on disk, focus-mode
//! readers, value parsing).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stretchcat-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Focus-mode signal errors
    #[error("Focus signal error: {0}")]
    Focus(#[from] FocusError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The control loop has shut down and no longer accepts events
    #[error("Control loop is no longer running")]
    LoopClosed,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to resolve or create the data directory
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised while reading the current focus mode.
///
/// None of these reach the policy: a failed reading is treated as
/// "no focus mode active".
#[derive(Error, Debug)]
pub enum FocusError {
    /// The backing file could not be read
    #[error("Cannot read focus state from {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not in the expected shape
    #[error("Malformed focus state document: {0}")]
    Malformed(String),

    /// The source is not available on this machine
    #[error("Focus source '{0}' is unavailable")]
    Unavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Time of day not in HH:MM form or out of range
    #[error("Invalid time of day '{0}': expected HH:MM between 00:00 and 23:59")]
    InvalidTimeOfDay(String),

    /// Unknown auto-start mode name
    #[error("Unknown auto-start mode '{0}'")]
    UnknownMode(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<serde_json::Error> for FocusError {
    fn from(err: serde_json::Error) -> Self {
        FocusError::Malformed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
