//! Error types for the changelist core.

use thiserror::Error;

/// Errors that can occur while encoding records or handling keys.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid ordering key: {0}")]
    InvalidKey(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
