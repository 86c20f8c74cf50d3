//! Proptest generators for property-based testing.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use whitelist_core::{Command, ListKey, ObjectId};

/// Reference model of the store: key to sorted members.
pub type Model = BTreeMap<ListKey, BTreeSet<ObjectId>>;

/// Generate a valid list key.
pub fn list_key() -> impl Strategy<Value = ListKey> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(|s| ListKey::new(s).expect("pattern yields valid keys"))
}

/// Generate one of a few keys, so that operations collide.
pub fn small_key() -> impl Strategy<Value = ListKey> {
    prop_oneof![Just("mods"), Just("admins"), Just("bots")]
        .prop_map(|s| ListKey::new(s).expect("valid key"))
}

/// Generate any object id.
pub fn object_id() -> impl Strategy<Value = ObjectId> {
    any::<u64>().prop_map(ObjectId)
}

/// Generate one of a few object ids.
pub fn small_id() -> impl Strategy<Value = ObjectId> {
    (0u64..8).prop_map(ObjectId)
}

/// Generate a mutating command over a small key and id space.
pub fn membership_op() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => (small_key(), small_id()).prop_map(|(key, id)| Command::Add { key, id }),
        3 => (small_key(), small_id()).prop_map(|(key, id)| Command::Remove { key, id }),
        1 => small_key().prop_map(|key| Command::RemoveAll { key }),
    ]
}

/// Generate a sequence of mutating commands.
pub fn membership_ops(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec(membership_op(), 0..=max_len)
}

/// Apply `command` to the reference model.
///
/// Lists that become empty are dropped, matching the store.
pub fn apply_to_model(model: &mut Model, command: &Command) {
    match command {
        Command::Add { key, id } => {
            model.entry(key.clone()).or_default().insert(*id);
        }
        Command::Remove { key, id } => {
            if let Some(members) = model.get_mut(key) {
                members.remove(id);
                if members.is_empty() {
                    model.remove(key);
                }
            }
        }
        Command::RemoveAll { key } => {
            model.remove(key);
        }
        Command::List | Command::ListDetail { .. } => {}
    }
}
