//! In-memory implementation of the Persistence trait.
//!
//! This is primarily for testing. It records what the store persisted and
//! can be told to fail writes, so rollback paths can be exercised without a
//! filesystem.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use whitelist_core::ListKey;

use crate::error::{Result, StoreError};
use crate::traits::{Persistence, Snapshot};

/// In-memory persistence.
///
/// All data is lost when dropped. Thread-safe via Mutex.
#[derive(Default)]
pub struct MemoryPersistence {
    lists: Mutex<Snapshot>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryPersistence {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `lists`.
    pub fn with_lists(lists: Snapshot) -> Self {
        Self {
            lists: Mutex::new(lists),
            ..Self::default()
        }
    }

    /// Make subsequent `save_all` and `delete_list` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `save_all` and `delete_list` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of what is currently persisted.
    pub fn persisted(&self) -> Snapshot {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.lists
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_writable(&self) -> std::io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(std::io::Error::other("writes disabled"))
        } else {
            Ok(())
        }
    }
}

impl Persistence for MemoryPersistence {
    fn load_all(&self) -> Result<Snapshot> {
        Ok(self.persisted())
    }

    fn save_all(&self, lists: &Snapshot, changed: &ListKey) -> Result<()> {
        if let Err(source) = self.check_writable() {
            return Err(StoreError::Write {
                key: changed.clone(),
                source,
            });
        }

        let mut persisted = self.lock();
        for (key, members) in lists {
            persisted.insert(key.clone(), members.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete_list(&self, key: &ListKey) -> Result<()> {
        if let Err(source) = self.check_writable() {
            return Err(StoreError::Delete {
                key: key.clone(),
                source,
            });
        }

        self.lock().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
