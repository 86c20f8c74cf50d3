//! Error types for the whitelist service.

use std::path::PathBuf;

use thiserror::Error;
use whitelist_router::RouterError;
use whitelist_store::StoreError;

/// Errors that can occur while running the whitelist service.
#[derive(Debug, Error)]
pub enum WhitelistError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Router or host error.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is malformed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for whitelist service operations.
pub type Result<T> = std::result::Result<T, WhitelistError>;
