//! # Whitelist Store
//!
//! The allow-list store: a mapping from [`ListKey`] to a set of
//! [`ObjectId`]s, kept identical to a persisted copy after every mutation.
//!
//! ## Overview
//!
//! Persistence is abstracted behind the [`Persistence`] trait. The primary
//! implementation is [`DirectoryPersistence`], which keeps one file per key,
//! with [`MemoryPersistence`] for tests. [`AllowListStore`] owns the
//! in-memory mapping behind a reader/writer lock and drives the backend.
//!
//! ## Key Types
//!
//! - [`AllowListStore`] - The store itself
//! - [`Persistence`] - The trait for persisting a [`Snapshot`]
//! - [`DirectoryPersistence`] - `<dir>/<key>.<ext>`, one id per line
//! - [`MemoryPersistence`] - In-memory persistence for tests
//! - [`AccessQuery`] - Read-only membership test for other subsystems
//!
//! ## Usage
//!
//! ```rust,no_run
//! use whitelist_store::{AccessQuery, AllowListStore, DirectoryPersistence};
//! use whitelist_core::{ListKey, ObjectId};
//!
//! fn example() -> whitelist_store::Result<()> {
//!     let persistence = DirectoryPersistence::open("Whitelist", "txt")?;
//!     let store = AllowListStore::open(persistence)?;
//!
//!     let key = ListKey::new("mods").unwrap();
//!     store.add(&key, ObjectId(111))?;
//!
//!     assert!(store.object_ok("mods", 111));
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Delete on empty**: a list with no members is removed, never persisted
//! - **Rollback**: a mutation whose persistence fails is undone in memory
//! - **Serialized writes**: one exclusive lock covers every mutation, including
//!   its persistence pass
//!
//! [`ListKey`]: whitelist_core::ListKey
//! [`ObjectId`]: whitelist_core::ObjectId

pub mod access;
pub mod directory;
pub mod error;
pub mod memory;
pub mod store;
pub mod traits;

pub use access::AccessQuery;
pub use directory::{DirectoryPersistence, DEFAULT_EXTENSION};
pub use error::{Result, StoreError};
pub use memory::MemoryPersistence;
pub use store::{AddResult, AllowListStore, Listing, RemoveResult};
pub use traits::{Persistence, Snapshot};
