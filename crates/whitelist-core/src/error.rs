//! Error types for the whitelist core.

use thiserror::Error;

/// Errors raised while constructing core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("list key is empty")]
    EmptyKey,

    #[error("list key exceeds {max} characters: {len}")]
    KeyTooLong { len: usize, max: usize },

    #[error("list key contains forbidden character {ch:?}")]
    ForbiddenCharacter { ch: char },

    #[error("list key must not start or end with '.'")]
    DotBoundary,

    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
