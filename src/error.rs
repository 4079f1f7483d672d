//! Error types.  The per-tick simulation is total; only configuration and
//! the asset-delivery boundary can fail.

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A curve family name that no wave knows how to fly.
    #[error("Unknown curve type: {0}")]
    UnknownCurve(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while handing freshly loaded models to the simulation.
#[derive(Error, Debug, PartialEq)]
pub enum SimError {
    #[error("expected {expected} render handles, got {got}")]
    HandleCount { expected: usize, got: usize },

    #[error("unknown curve type: {0}")]
    UnknownCurve(String),
}
