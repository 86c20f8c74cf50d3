//! Authorization query interface.
//!
//! The narrow, read-only seam other subsystems use to ask "is object X
//! allowed under policy key K?". It only ever answers with a boolean and
//! never touches persistence.

use std::sync::Arc;

use whitelist_core::ObjectId;

use crate::store::AllowListStore;
use crate::traits::Persistence;

/// Read-only membership test.
pub trait AccessQuery: Send + Sync {
    /// Whether `object_id` is allowed under `key`.
    ///
    /// Unknown keys allow nothing.
    fn object_ok(&self, key: &str, object_id: u64) -> bool;
}

impl<P: Persistence> AccessQuery for AllowListStore<P> {
    fn object_ok(&self, key: &str, object_id: u64) -> bool {
        self.query(key, ObjectId(object_id))
    }
}

impl<T: AccessQuery + ?Sized> AccessQuery for Arc<T> {
    fn object_ok(&self, key: &str, object_id: u64) -> bool {
        (**self).object_ok(key, object_id)
    }
}
