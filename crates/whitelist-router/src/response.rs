//! Reply text shared by every front-end.

use whitelist_core::{ListKey, ObjectId};
use whitelist_store::StoreError;

/// Reply when the caller lacks management privilege.
pub const PERMISSION_DENIED: &str = "You do not have permission to manage whitelists here";

/// Reply when the command arrived outside a scoped context.
pub const CONTEXT_REQUIRED: &str = "Whitelists can only be managed from within a server";

/// The caller-resolvable reference form of an identifier.
pub fn reference(id: ObjectId) -> String {
    format!("<#{}>", id)
}

/// Every defined key on one line.
pub fn key_listing(keys: &[ListKey]) -> String {
    if keys.is_empty() {
        return "No whitelists are defined".to_string();
    }
    let names: Vec<String> = keys.iter().map(|k| format!("`{}`", k)).collect();
    format!("Whitelists: {}", names.join(", "))
}

/// One line per member: the raw id and its reference form.
pub fn member_listing(members: &[ObjectId]) -> String {
    members
        .iter()
        .map(|id| format!("{} ({})", id, reference(*id)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reply when an authorized command could not be applied.
pub fn store_failure(key: Option<&ListKey>, error: &StoreError) -> String {
    match key {
        Some(key) => format!("Failed to update whitelist `{}`: {}", key, error),
        None => format!("Failed to update whitelists: {}", error),
    }
}
