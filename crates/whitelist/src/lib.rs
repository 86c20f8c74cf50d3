//! # Whitelist
//!
//! Named allow-lists of object identifiers, managed through chat commands
//! and queried by other subsystems.
//!
//! ## Overview
//!
//! - **Store**: an in-memory mapping from list key to member ids, mirrored to
//!   one plain-text file per key
//! - **Router**: legacy text commands and structured commands, both gated on
//!   the host's notion of management privilege
//! - **Access**: a read-only `object_ok(key, id)` query
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use whitelist::{Whitelist, WhitelistConfig};
//! use whitelist::router::host::memory::MemoryHost;
//!
//! async fn example() {
//!     let host = Arc::new(MemoryHost::new());
//!     let service = Whitelist::open(WhitelistConfig::default(), host).unwrap();
//!     service.start().await.unwrap();
//!
//!     if service.object_ok("mods", 1234) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `whitelist::core` - keys, ids and commands
//! - `whitelist::store` - the store and its persistence backends
//! - `whitelist::router` - front-ends, router and host interface

pub mod config;
pub mod error;
pub mod whitelist;

// Re-export component crates
pub use whitelist_core as core;
pub use whitelist_router as router;
pub use whitelist_store as store;

// Re-export main types for convenience
pub use config::WhitelistConfig;
pub use error::{Result, WhitelistError};
pub use whitelist::Whitelist;

pub use whitelist_core::{Command, ListKey, ObjectId, Outcome};
pub use whitelist_router::{CommandContext, Host, InboundMessage, SlashCommand};
pub use whitelist_store::{AccessQuery, AllowListStore, DirectoryPersistence, Persistence};
