//! # Whitelist Testkit
//!
//! Testing utilities for the whitelist crates.
//!
//! ## Overview
//!
//! - **Fixtures**: a temporary list directory with helpers to seed, inspect
//!   and open it, plus privileged and unprivileged caller contexts
//! - **Generators**: proptest strategies for keys, ids and command sequences,
//!   with a reference model to check the store against
//!
//! ## Test Fixtures
//!
//! ```rust
//! use whitelist_testkit::fixtures::{id, TestFixture};
//!
//! let fixture = TestFixture::with_files(&[("mods.txt", "111\n")]);
//! let store = fixture.open_store();
//! assert!(store.query("mods", id(111)));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use whitelist_testkit::generators::{apply_to_model, membership_ops, Model};
//!
//! proptest! {
//!     #[test]
//!     fn store_matches_model(ops in membership_ops(32)) {
//!         let mut model = Model::new();
//!         for op in &ops {
//!             apply_to_model(&mut model, op);
//!         }
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{admin_context, admin_host, admin_message, member_context, TestFixture};
pub use generators::{apply_to_model, membership_op, membership_ops, Model};
