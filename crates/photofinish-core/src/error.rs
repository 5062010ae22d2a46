//! Error types for PhotoFinish.

use thiserror::Error;

/// Main error type for PhotoFinish operations.
#[derive(Error, Debug)]
pub enum PhotoFinishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("requested time {requested_secs:.3}s outside media range [0, {duration_secs:.3}]s")]
    OutOfRange {
        requested_secs: f64,
        duration_secs: f64,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Composite error: {0}")]
    Composite(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("lane '{label}' already has a recorded finish; overwrite requires confirmation")]
    AmbiguousLaneOverwrite { label: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PhotoFinish operations.
pub type Result<T> = std::result::Result<T, PhotoFinishError>;
