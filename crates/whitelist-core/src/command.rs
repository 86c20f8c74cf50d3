//! The parsed command shared by every front-end.
//!
//! Front-ends differ only in how they read a request and how they word the
//! reply. Both funnel into [`Command`] so that the store sees identical
//! semantics whichever protocol the request arrived on.

use serde::{Deserialize, Serialize};

use crate::types::{ListKey, ObjectId};

/// A request against the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Insert `id` into `key`, creating the list if needed.
    Add { key: ListKey, id: ObjectId },
    /// Remove `id` from `key`; deletes the list if it becomes empty.
    Remove { key: ListKey, id: ObjectId },
    /// Delete `key` and every member.
    RemoveAll { key: ListKey },
    /// Enumerate every defined key.
    List,
    /// Enumerate the members of `key`, or every key if it is unknown.
    ListDetail { key: ListKey },
}

impl Command {
    /// The list this command targets, if any.
    pub fn key(&self) -> Option<&ListKey> {
        match self {
            Command::Add { key, .. }
            | Command::Remove { key, .. }
            | Command::RemoveAll { key }
            | Command::ListDetail { key } => Some(key),
            Command::List => None,
        }
    }

    /// Whether executing this command writes to the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Remove { .. } | Command::RemoveAll { .. }
        )
    }
}

/// The result of executing a [`Command`], ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `id` is now a member of `key`.
    Added {
        key: ListKey,
        id: ObjectId,
        /// False if `id` was already present.
        inserted: bool,
    },
    /// `id` is no longer a member of `key`.
    Removed {
        key: ListKey,
        id: ObjectId,
        /// True if this removal emptied and deleted the list.
        list_deleted: bool,
    },
    /// `key` no longer exists.
    RemovedAll { key: ListKey, existed: bool },
    /// Every defined key, sorted.
    Keys(Vec<ListKey>),
    /// Members of one key, sorted.
    Members { key: ListKey, members: Vec<ObjectId> },
}
