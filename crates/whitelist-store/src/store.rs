//! The allow-list store.
//!
//! Owns the key -> members mapping and keeps it identical to the persisted
//! copy. Every mutation takes the exclusive side of one store-wide lock and
//! holds it through the persistence pass, so mutations are fully serialized
//! even when they target different keys. Reads take the shared side and can
//! never observe a half-applied mutation.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};
use whitelist_core::{ListKey, ObjectId};

use crate::error::{Result, StoreError};
use crate::traits::{Persistence, Snapshot};

/// Result of adding an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// The identifier was new to the list.
    Inserted,
    /// The identifier was already present (idempotent, not an error).
    AlreadyPresent,
}

/// Result of removing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    /// The identifier was removed and the list still has members.
    Removed,
    /// The identifier was the last member; the whole list was deleted.
    ListDeleted,
    /// The key or the identifier did not exist (not an error).
    NotFound,
}

/// A detail listing: the members of one key, or every key if it is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Sorted members of the requested key.
    Members(Vec<ObjectId>),
    /// Every defined key, sorted.
    Keys(Vec<ListKey>),
}

/// The allow-list store.
///
/// # Invariants
///
/// - No list in memory or on disk is empty.
/// - After every completed mutation, memory equals what `P` persisted.
/// - A mutation whose persistence fails is rolled back in memory.
pub struct AllowListStore<P: Persistence> {
    persistence: P,
    lists: RwLock<Snapshot>,
}

impl<P: Persistence> AllowListStore<P> {
    /// Open a store, loading every list from `persistence`.
    ///
    /// Fails if the backend cannot be listed; the store must not start from
    /// a partial view.
    pub fn open(persistence: P) -> Result<Self> {
        let store = Self {
            persistence,
            lists: RwLock::new(Snapshot::new()),
        };
        store.reload()?;
        Ok(store)
    }

    /// The persistence backend.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Replace the in-memory mapping with a fresh load.
    ///
    /// Lists that load with no valid members are deleted from the backend.
    /// Returns the number of lists loaded.
    pub fn reload(&self) -> Result<usize> {
        let mut lists = self.write_lists()?;
        let mut loaded = self.persistence.load_all()?;

        let empty: Vec<ListKey> = loaded
            .iter()
            .filter(|(_, members)| members.is_empty())
            .map(|(key, _)| key.clone())
            .collect();
        for key in empty {
            warn!(%key, "pruning list with no valid members");
            self.persistence.delete_list(&key)?;
            loaded.remove(&key);
        }

        *lists = loaded;
        info!(lists = lists.len(), "loaded allow-lists");
        Ok(lists.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add `id` to `key`, creating the list if absent, then persist.
    ///
    /// The store is persisted even when `id` was already present.
    pub fn add(&self, key: &ListKey, id: ObjectId) -> Result<AddResult> {
        let mut lists = self.write_lists()?;

        let created = !lists.contains_key(key);
        let inserted = lists.entry(key.clone()).or_default().insert(id);

        if let Err(e) = self.persistence.save_all(&lists, key) {
            if created {
                lists.remove(key);
            } else if inserted {
                if let Some(members) = lists.get_mut(key) {
                    members.remove(&id);
                }
            }
            return Err(e);
        }

        debug!(%key, %id, inserted, "added to allow-list");
        Ok(if inserted {
            AddResult::Inserted
        } else {
            AddResult::AlreadyPresent
        })
    }

    /// Remove `id` from `key`.
    ///
    /// If that empties the list, the list is deleted instead of persisted
    /// empty. Unknown keys and identifiers are a no-op.
    pub fn remove(&self, key: &ListKey, id: ObjectId) -> Result<RemoveResult> {
        let mut lists = self.write_lists()?;

        let Some(members) = lists.get_mut(key) else {
            return Ok(RemoveResult::NotFound);
        };
        if !members.remove(&id) {
            return Ok(RemoveResult::NotFound);
        }

        if members.is_empty() {
            if let Err(e) = self.persistence.delete_list(key) {
                members.insert(id);
                return Err(e);
            }
            lists.remove(key);
            debug!(%key, %id, "removed last member, deleted allow-list");
            return Ok(RemoveResult::ListDeleted);
        }

        if let Err(e) = self.persistence.save_all(&lists, key) {
            if let Some(members) = lists.get_mut(key) {
                members.insert(id);
            }
            return Err(e);
        }

        debug!(%key, %id, "removed from allow-list");
        Ok(RemoveResult::Removed)
    }

    /// Delete `key` and its backing data.
    ///
    /// Returns whether the key existed. An absent key touches nothing.
    pub fn remove_all(&self, key: &ListKey) -> Result<bool> {
        let mut lists = self.write_lists()?;

        if !lists.contains_key(key) {
            return Ok(false);
        }

        self.persistence.delete_list(key)?;
        lists.remove(key);
        debug!(%key, "deleted allow-list");
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries (never persist)
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `id` is a member of `key`. Unknown keys allow nothing.
    pub fn query(&self, key: &str, id: ObjectId) -> bool {
        self.read_lists()
            .get(key)
            .is_some_and(|members| members.contains(&id))
    }

    /// Whether a list named `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read_lists().contains_key(key)
    }

    /// Every defined key, sorted.
    pub fn list_keys(&self) -> Vec<ListKey> {
        let mut keys: Vec<ListKey> = self.read_lists().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Members of `key`, sorted. Empty if the key is unknown.
    pub fn list_members(&self, key: &str) -> Vec<ObjectId> {
        let mut members: Vec<ObjectId> = self
            .read_lists()
            .get(key)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Members of `key` as a set, if the key exists.
    pub fn members(&self, key: &str) -> Option<HashSet<ObjectId>> {
        self.read_lists().get(key).cloned()
    }

    /// Members of `key`, or every key if `key` is unknown, from one read.
    pub fn list_detail(&self, key: &str) -> Listing {
        let lists = self.read_lists();
        match lists.get(key) {
            Some(members) => {
                let mut members: Vec<ObjectId> = members.iter().copied().collect();
                members.sort();
                Listing::Members(members)
            }
            None => {
                let mut keys: Vec<ListKey> = lists.keys().cloned().collect();
                keys.sort();
                Listing::Keys(keys)
            }
        }
    }

    /// Number of defined lists.
    pub fn len(&self) -> usize {
        self.read_lists().len()
    }

    /// Whether no lists are defined.
    pub fn is_empty(&self) -> bool {
        self.read_lists().is_empty()
    }

    fn write_lists(&self) -> Result<RwLockWriteGuard<'_, Snapshot>> {
        self.lists.write().map_err(|_| StoreError::LockPoisoned)
    }

    // Mutations roll back before releasing the lock, so a poisoned map is
    // still consistent for readers.
    fn read_lists(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.lists.read().unwrap_or_else(PoisonError::into_inner)
    }
}
