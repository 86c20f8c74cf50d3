//! Error types for the router module.

use thiserror::Error;
use whitelist_core::CoreError;

/// Errors that escape the router.
///
/// Rejected or malformed commands are answered with a reply, not an error;
/// only failures of the host itself surface here.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A host capability (permission lookup, reply, registry) failed.
    #[error("host error: {0}")]
    Host(String),
}

/// Why a front-end could not turn its input into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Wrong number of whitespace-separated tokens.
    #[error("expected {expected} tokens, got {got}")]
    WrongArity { expected: usize, got: usize },

    /// The command name is not ours.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The action or sub-command is not recognized.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A required option was not supplied.
    #[error("missing option: {0}")]
    MissingOption(&'static str),

    /// An option was supplied with the wrong kind of value.
    #[error("option {0} has the wrong type")]
    WrongOptionType(&'static str),

    /// A key or identifier failed validation.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
