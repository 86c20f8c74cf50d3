//! Legacy inline text front-end.
//!
//! Recognizes exactly:
//!
//! ```text
//! <prefix><name> add <key> <id>
//! <prefix><name> remove <key> <id>
//! <prefix><name> remove <key> all
//! ```
//!
//! split on whitespace into four tokens. Anything else addressed to the
//! command gets the usage reply.

use whitelist_core::{Command, ListKey, ObjectId, Outcome};

use crate::error::ParseError;
use crate::frontend::FrontEnd;
use crate::response;

/// Default prefix for legacy commands.
pub const DEFAULT_PREFIX: &str = ".";

/// The legacy text command parser.
#[derive(Debug, Clone)]
pub struct LegacyFrontEnd {
    trigger: String,
}

impl LegacyFrontEnd {
    /// A front-end triggered by `<prefix><command_name>`.
    pub fn new(prefix: &str, command_name: &str) -> Self {
        Self {
            trigger: format!("{}{}", prefix, command_name),
        }
    }

    /// The first token a message must carry, e.g. `.whitelist`.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Whether `content` is addressed to this command at all.
    ///
    /// Any message starting with the trigger counts, so `.whitelistadd` is
    /// answered with the usage text rather than ignored.
    pub fn is_addressed(&self, content: &str) -> bool {
        content.trim_start().starts_with(self.trigger.as_str())
    }
}

impl Default for LegacyFrontEnd {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, "whitelist")
    }
}

impl FrontEnd for LegacyFrontEnd {
    type Input = str;

    fn parse(&self, content: &str) -> Result<Command, ParseError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let [trigger, action, key, target] = tokens.as_slice() else {
            return Err(ParseError::WrongArity {
                expected: 4,
                got: tokens.len(),
            });
        };

        if *trigger != self.trigger {
            return Err(ParseError::UnknownCommand(trigger.to_string()));
        }

        let key: ListKey = key.parse()?;
        match *action {
            "add" => Ok(Command::Add {
                key,
                id: target.parse::<ObjectId>()?,
            }),
            "remove" if *target == "all" => Ok(Command::RemoveAll { key }),
            "remove" => Ok(Command::Remove {
                key,
                id: target.parse::<ObjectId>()?,
            }),
            other => Err(ParseError::UnknownAction(other.to_string())),
        }
    }

    fn usage(&self) -> String {
        format!(
            "Error processing command, usage: {} [add|remove] [key] [all|objectID]",
            self.trigger
        )
    }

    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Added { key, id, .. } => format!("Added {} to {}", id, key),
            Outcome::Removed { key, id, .. } => format!("Removed {} from {}", id, key),
            Outcome::RemovedAll { key, .. } => format!("Removed key {}", key),
            Outcome::Keys(keys) => response::key_listing(keys),
            Outcome::Members { members, .. } => response::member_listing(members),
        }
    }
}
