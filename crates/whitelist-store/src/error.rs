//! Error types for the store module.

use std::path::PathBuf;

use thiserror::Error;
use whitelist_core::ListKey;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configured list file extension cannot round-trip through a file name.
    #[error("invalid list file extension {0:?}")]
    InvalidExtension(String),

    /// The persistence directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persistence directory could not be listed.
    #[error("failed to list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a list failed; the changed list was not committed.
    #[error("failed to write list {key}: {source}")]
    Write {
        key: ListKey,
        #[source]
        source: std::io::Error,
    },

    /// Deleting a list's backing file failed.
    #[error("failed to delete list {key}: {source}")]
    Delete {
        key: ListKey,
        #[source]
        source: std::io::Error,
    },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
