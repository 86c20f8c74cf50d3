//! Persistence trait: the abstract interface for storing allow-lists.
//!
//! This trait keeps the store backend-agnostic. Implementations include a
//! per-key file directory (primary) and in-memory (for tests).

use std::collections::{HashMap, HashSet};

use whitelist_core::{ListKey, ObjectId};

use crate::error::Result;

/// A full copy of the store contents.
pub type Snapshot = HashMap<ListKey, HashSet<ObjectId>>;

/// Persistence backend for [`AllowListStore`](crate::AllowListStore).
///
/// All methods are synchronous. The store calls them while holding its
/// exclusive lock, so implementations never see concurrent writes.
///
/// # Design Notes
///
/// - **Full rewrite**: `save_all` receives every list, not just the changed one.
/// - **Lenient load**: unparseable members are skipped, not reported.
/// - **Idempotent delete**: deleting an absent list is not an error.
pub trait Persistence: Send + Sync {
    /// Load every persisted list.
    ///
    /// Lists may come back empty if their backing data holds no valid
    /// members; the store prunes those.
    fn load_all(&self) -> Result<Snapshot>;

    /// Persist every list in `lists`, overwriting previous content.
    ///
    /// Every list other than `changed` already matches what is persisted.
    /// `changed` is committed last, so a failed pass leaves its previous
    /// content in place.
    fn save_all(&self, lists: &Snapshot, changed: &ListKey) -> Result<()>;

    /// Remove the persisted copy of `key`, if any.
    fn delete_list(&self, key: &ListKey) -> Result<()>;
}

