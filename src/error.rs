//! Error types for bubbl.
//!
//! Capacity errors are backpressure, not failures: the triggering action is
//! dropped. Configuration errors surface while loading settings.

use std::fmt;

/// A fixed-size pool had no free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// Every regular bubble slot is alive
    Bubbles { capacity: usize },
    /// Every pop burst slot is alive
    Bursts { capacity: usize },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityError::Bubbles { capacity } => {
                write!(f, "bubble arena full ({} slots)", capacity)
            }
            CapacityError::Bursts { capacity } => {
                write!(f, "pop burst pool full ({} slots)", capacity)
            }
        }
    }
}

impl std::error::Error for CapacityError {}

/// Errors that can occur while loading or saving settings.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the settings file.
    Io(std::io::Error),
    /// Settings file is not valid JSON for `Settings`.
    Json(serde_json::Error),
    /// Settings parsed but contain an unusable value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access settings file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse settings: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
