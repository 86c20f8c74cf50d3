//! Structured command definition and idempotent registration.
//!
//! The definition is what the host announces to the platform so users get
//! typed sub-commands. Registration checks the upstream registry first and
//! skips re-registering a command that is already there.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::host::Host;
use crate::structured::{
    ADD_CHANNEL, ADD_SELECT, DESTROY_LIST, LIST_NAME, REMOVE_CHANNEL, REMOVE_SELECT,
};

/// Kind of value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Free text (list names).
    String,
    /// A channel, resolved by the platform to its numeric id.
    Channel,
}

/// One option of a sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
}

/// One sub-command of the top-level command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionDefinition>,
}

/// A top-level structured command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub subcommands: Vec<SubcommandDefinition>,
}

/// Whether registration had to announce the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The command was announced now.
    Registered,
    /// The command was already known upstream; nothing was sent.
    AlreadyRegistered,
}

fn option(name: &str, description: &str, kind: OptionKind, required: bool) -> OptionDefinition {
    OptionDefinition {
        name: name.to_string(),
        description: description.to_string(),
        kind,
        required,
    }
}

fn subcommand(
    name: &str,
    description: &str,
    options: Vec<OptionDefinition>,
) -> SubcommandDefinition {
    SubcommandDefinition {
        name: name.to_string(),
        description: description.to_string(),
        options,
    }
}

/// The whitelist command definition, announced under `name`.
pub fn whitelist_command(name: &str) -> CommandDefinition {
    CommandDefinition {
        name: name.to_string(),
        description: "Manage channel whitelists".to_string(),
        subcommands: vec![
            subcommand(
                "list",
                "List whitelists, or the members of one whitelist",
                vec![option(LIST_NAME, "Whitelist to show", OptionKind::String, false)],
            ),
            subcommand(
                "destroy",
                "Delete a whitelist",
                vec![option(DESTROY_LIST, "Whitelist to delete", OptionKind::String, true)],
            ),
            subcommand(
                "add",
                "Add a channel to a whitelist",
                vec![
                    option(ADD_SELECT, "Whitelist to add to", OptionKind::String, true),
                    option(ADD_CHANNEL, "Channel to add", OptionKind::Channel, true),
                ],
            ),
            subcommand(
                "remove",
                "Remove a channel from a whitelist",
                vec![
                    option(REMOVE_SELECT, "Whitelist to remove from", OptionKind::String, true),
                    option(REMOVE_CHANNEL, "Channel to remove", OptionKind::Channel, true),
                ],
            ),
        ],
    }
}

/// Register `definition` with `host` unless a command of that name exists.
pub async fn ensure_registered<H: Host + ?Sized>(
    host: &H,
    definition: &CommandDefinition,
) -> Result<Registration> {
    let existing = host.registered_commands().await?;
    if existing.iter().any(|name| name == &definition.name) {
        info!(command = %definition.name, "command already registered");
        return Ok(Registration::AlreadyRegistered);
    }

    host.register_command(definition).await?;
    info!(command = %definition.name, "registered command");
    Ok(Registration::Registered)
}
