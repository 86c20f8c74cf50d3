//! # Whitelist Core
//!
//! Pure primitives for the whitelist store: list keys, object identifiers,
//! and the parsed command shared by every command front-end.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`ListKey`] - Validated, filesystem-safe name of one allow-list
//! - [`ObjectId`] - Unsigned 64-bit identifier of a guarded object
//! - [`Command`] - A parsed request (add, remove, remove-all, list)
//! - [`Outcome`] - What executing a [`Command`] did to the store
//!
//! ## Key Rules
//!
//! See [`validation`] for the exact rules a [`ListKey`] must satisfy.

pub mod command;
pub mod error;
pub mod types;
pub mod validation;

pub use command::{Command, Outcome};
pub use error::{CoreError, Result};
pub use types::{ListKey, ObjectId};
pub use validation::{validate_key, MAX_KEY_LEN};
