//! Error types for tlog-types

use thiserror::Error;

/// Errors that can occur in tlog-types
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed hex or base64 input, or a digest of the wrong length
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A segment whose start is not strictly below its end
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),
}

/// Result type for tlog-types operations
pub type Result<T> = std::result::Result<T, Error>;
