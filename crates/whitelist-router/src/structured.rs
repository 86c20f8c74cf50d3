//! Structured (platform-native) command front-end.
//!
//! One top-level command with four sub-commands:
//!
//! ```text
//! /whitelist list [whitelistname]
//! /whitelist destroy <destroylist>
//! /whitelist add <addselect> <addchannel>
//! /whitelist remove <removeselect> <removechannel>
//! ```
//!
//! Channel arguments are resolved by the platform to numeric ids before they
//! reach this module.

use serde::{Deserialize, Serialize};
use whitelist_core::{Command, CoreError, ListKey, ObjectId, Outcome};

use crate::error::ParseError;
use crate::frontend::FrontEnd;
use crate::response;

/// Option of `list`: the whitelist to show.
pub const LIST_NAME: &str = "whitelistname";
/// Option of `destroy`: the whitelist to delete.
pub const DESTROY_LIST: &str = "destroylist";
/// Option of `add`: the whitelist to add to.
pub const ADD_SELECT: &str = "addselect";
/// Option of `add`: the channel to add.
pub const ADD_CHANNEL: &str = "addchannel";
/// Option of `remove`: the whitelist to remove from.
pub const REMOVE_SELECT: &str = "removeselect";
/// Option of `remove`: the channel to remove.
pub const REMOVE_CHANNEL: &str = "removechannel";

/// A typed option value as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Channel(u64),
}

/// A named option and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

/// One invocation of a structured command with its selected sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommand {
    pub name: String,
    pub subcommand: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl SlashCommand {
    /// An invocation with no options.
    pub fn new(name: impl Into<String>, subcommand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcommand: subcommand.into(),
            options: Vec::new(),
        }
    }

    /// Add an option.
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            value,
        });
        self
    }

    /// Look up an option by name.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }
}

/// The structured command parser.
#[derive(Debug, Clone)]
pub struct StructuredFrontEnd {
    command_name: String,
}

impl StructuredFrontEnd {
    /// A front-end for the command called `command_name`.
    pub fn new(command_name: &str) -> Self {
        Self {
            command_name: command_name.to_string(),
        }
    }

    /// The top-level command name.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Build an invocation from its typed-out form, e.g.
    /// `/whitelist add mods <#123>`.
    ///
    /// Arguments are assigned to options by position. Channel arguments may
    /// be written raw (`123`) or as a reference (`<#123>`).
    pub fn from_text(&self, line: &str) -> Result<SlashCommand, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((head, rest)) = tokens.split_first() else {
            return Err(ParseError::WrongArity {
                expected: 2,
                got: 0,
            });
        };
        if head.strip_prefix('/') != Some(self.command_name.as_str()) {
            return Err(ParseError::UnknownCommand(head.to_string()));
        }
        let Some((sub, args)) = rest.split_first() else {
            return Err(ParseError::WrongArity {
                expected: 2,
                got: 1,
            });
        };

        let slots: &[(&'static str, bool)] = match *sub {
            "list" => &[(LIST_NAME, false)],
            "destroy" => &[(DESTROY_LIST, false)],
            "add" => &[(ADD_SELECT, false), (ADD_CHANNEL, true)],
            "remove" => &[(REMOVE_SELECT, false), (REMOVE_CHANNEL, true)],
            other => return Err(ParseError::UnknownAction(other.to_string())),
        };
        if args.len() > slots.len() {
            return Err(ParseError::WrongArity {
                expected: slots.len() + 2,
                got: tokens.len(),
            });
        }

        let mut command = SlashCommand::new(self.command_name.as_str(), *sub);
        for ((name, is_channel), arg) in slots.iter().zip(args) {
            let value = match (*is_channel, channel_reference(arg)) {
                (true, Some(id)) => OptionValue::Channel(id),
                _ => OptionValue::String(arg.to_string()),
            };
            command = command.with_option(*name, value);
        }
        Ok(command)
    }
}

impl Default for StructuredFrontEnd {
    fn default() -> Self {
        Self::new("whitelist")
    }
}

impl FrontEnd for StructuredFrontEnd {
    type Input = SlashCommand;

    fn parse(&self, command: &SlashCommand) -> Result<Command, ParseError> {
        if command.name != self.command_name {
            return Err(ParseError::UnknownCommand(command.name.clone()));
        }

        match command.subcommand.as_str() {
            // An invalid name is just an unknown list: show everything
            "list" => match command.option(LIST_NAME) {
                None => Ok(Command::List),
                Some(OptionValue::String(name)) => Ok(ListKey::new(name.as_str())
                    .map(|key| Command::ListDetail { key })
                    .unwrap_or(Command::List)),
                Some(_) => Err(ParseError::WrongOptionType(LIST_NAME)),
            },
            "destroy" => Ok(Command::RemoveAll {
                key: key_option(command, DESTROY_LIST)?,
            }),
            "add" => Ok(Command::Add {
                key: key_option(command, ADD_SELECT)?,
                id: id_option(command, ADD_CHANNEL)?,
            }),
            "remove" => Ok(Command::Remove {
                key: key_option(command, REMOVE_SELECT)?,
                id: id_option(command, REMOVE_CHANNEL)?,
            }),
            other => Err(ParseError::UnknownAction(other.to_string())),
        }
    }

    fn usage(&self) -> String {
        format!(
            "Error processing command, usage: /{0} list [name] | /{0} destroy <name> | /{0} add <name> <channel> | /{0} remove <name> <channel>",
            self.command_name
        )
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Added { key, id, .. } => {
                format!("Added {} to whitelist `{}`", response::reference(*id), key)
            }
            Outcome::Removed { key, id, .. } => {
                format!("Removed {} from whitelist `{}`", response::reference(*id), key)
            }
            Outcome::RemovedAll { key, .. } => format!("Deleted whitelist `{}`", key),
            Outcome::Keys(keys) => response::key_listing(keys),
            Outcome::Members { members, .. } => response::member_listing(members),
        }
    }
}

fn key_option(command: &SlashCommand, name: &'static str) -> Result<ListKey, ParseError> {
    match command.option(name) {
        Some(OptionValue::String(s)) => Ok(ListKey::new(s.as_str())?),
        Some(_) => Err(ParseError::WrongOptionType(name)),
        None => Err(ParseError::MissingOption(name)),
    }
}

fn id_option(command: &SlashCommand, name: &'static str) -> Result<ObjectId, ParseError> {
    match command.option(name) {
        Some(OptionValue::Channel(id)) => Ok(ObjectId(*id)),
        Some(OptionValue::Integer(i)) => u64::try_from(*i)
            .map(ObjectId)
            .map_err(|_| CoreError::InvalidObjectId(i.to_string()).into()),
        Some(OptionValue::String(s)) => Ok(s.parse::<ObjectId>()?),
        None => Err(ParseError::MissingOption(name)),
    }
}

/// Parse `123` or `<#123>` into a channel id.
fn channel_reference(arg: &str) -> Option<u64> {
    let raw = arg
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);
    raw.parse().ok()
}
