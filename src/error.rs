//! Error types for the repetition counting library.
//!
//! Only hard failures live here. Expected stream conditions (missing joints,
//! shallow reps, degenerate geometry) are reported on each
//! [`FrameResult`](crate::exercises::FrameResult) instead.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration could not be parsed or written
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON replay record could not be parsed or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Smoothing filter specification is unknown or out of range
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Exercise or file configuration rejected at setup
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Replay stream is malformed beyond recovery
    #[error("Replay error: {0}")]
    ReplayError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
