//! The front-end seam.
//!
//! A front-end owns one wire shape for commands: it parses that shape into a
//! [`Command`] and words the reply for an [`Outcome`]. The router handles
//! everything in between, so every front-end drives identical store
//! semantics.

use whitelist_core::{Command, Outcome};

use crate::error::ParseError;

/// A command protocol.
pub trait FrontEnd: Send + Sync {
    /// The raw request this front-end understands.
    type Input: ?Sized + Sync;

    /// Parse a request into a command.
    fn parse(&self, input: &Self::Input) -> Result<Command, ParseError>;

    /// The reply sent for input that does not parse.
    fn usage(&self) -> String;

    /// The reply sent after a command executed.
    fn render(&self, outcome: &Outcome) -> String;
}
