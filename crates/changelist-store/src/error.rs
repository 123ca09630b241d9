//! Error types for the store module.

use std::path::PathBuf;

use changelist_core::CoreError;
use thiserror::Error;

/// Errors that can occur during changelist operations.
#[derive(Debug, Error)]
pub enum ChangelistError {
    /// The backing directory could not be created or opened.
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] CoreError),

    /// Writing an entry failed.
    #[error("write failed for {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be removed. Only returned under
    /// [`ClearPolicy::Strict`](crate::ClearPolicy::Strict).
    #[error("failed to remove {}: {source}", path.display())]
    Removal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The changelist has been closed.
    #[error("changelist is closed")]
    Closed,
}

/// Result type for changelist operations.
pub type Result<T> = std::result::Result<T, ChangelistError>;
