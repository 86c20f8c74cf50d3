//! Host abstraction: the capabilities the router borrows from the bot runtime.
//!
//! The router never talks to a chat service directly. Permission lookup,
//! replies and command registration are all delegated to a [`Host`]
//! implementation supplied by whatever runtime embeds the store.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registration::CommandDefinition;

/// Identifier of the user who issued a command.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of the channel a command arrived on (and is answered on).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

/// Identifier of the scoped context (e.g. a guild) a command was issued in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub u64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a command came from and who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// The issuing user.
    pub caller: UserId,
    /// Whether the issuing account is itself a bot.
    #[serde(default)]
    pub caller_is_bot: bool,
    /// Channel to reply on.
    pub channel: ChannelId,
    /// Scoped context, absent for direct messages.
    pub scope: Option<ScopeId>,
}

impl CommandContext {
    /// A human caller inside `scope`.
    pub fn scoped(caller: UserId, channel: ChannelId, scope: ScopeId) -> Self {
        Self {
            caller,
            caller_is_bot: false,
            channel,
            scope: Some(scope),
        }
    }

    /// A human caller with no scoped context.
    pub fn unscoped(caller: UserId, channel: ChannelId) -> Self {
        Self {
            caller,
            caller_is_bot: false,
            channel,
            scope: None,
        }
    }
}

/// Host trait for the runtime capabilities the router consumes.
///
/// Implementations must be thread-safe (Send + Sync); the host delivers
/// commands concurrently.
#[async_trait]
pub trait Host: Send + Sync {
    /// Whether `caller` holds management privilege within `scope`.
    async fn can_manage(&self, caller: UserId, scope: ScopeId) -> Result<bool>;

    /// Send `text` to `channel`.
    async fn reply(&self, channel: ChannelId, text: &str) -> Result<()>;

    /// Names of the commands currently registered upstream.
    async fn registered_commands(&self) -> Result<Vec<String>>;

    /// Announce a command to the platform.
    async fn register_command(&self, definition: &CommandDefinition) -> Result<()>;
}

/// A simple in-memory host for testing.
///
/// Records replies and registrations; privilege is granted per
/// `(scope, user)` pair.
pub mod memory {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    use crate::error::RouterError;

    /// In-memory host implementation.
    #[derive(Default)]
    pub struct MemoryHost {
        managers: RwLock<HashSet<(ScopeId, UserId)>>,
        replies: RwLock<Vec<(ChannelId, String)>>,
        registered: RwLock<Vec<CommandDefinition>>,
        failing: AtomicBool,
    }

    impl MemoryHost {
        /// Create a host with no privileged users.
        pub fn new() -> Self {
            Self::default()
        }

        /// Give `user` management privilege within `scope`.
        pub async fn grant_manage(&self, scope: ScopeId, user: UserId) {
            self.managers.write().await.insert((scope, user));
        }

        /// Make every capability return an error.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Every reply sent so far, in order.
        pub async fn replies(&self) -> Vec<(ChannelId, String)> {
            self.replies.read().await.clone()
        }

        /// The most recent reply text, if any.
        pub async fn last_reply(&self) -> Option<String> {
            self.replies.read().await.last().map(|(_, text)| text.clone())
        }

        /// Every definition registered so far, in order.
        pub async fn registrations(&self) -> Vec<CommandDefinition> {
            self.registered.read().await.clone()
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(RouterError::Host("host unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Host for MemoryHost {
        async fn can_manage(&self, caller: UserId, scope: ScopeId) -> Result<bool> {
            self.check()?;
            Ok(self.managers.read().await.contains(&(scope, caller)))
        }

        async fn reply(&self, channel: ChannelId, text: &str) -> Result<()> {
            self.check()?;
            self.replies.write().await.push((channel, text.to_string()));
            Ok(())
        }

        async fn registered_commands(&self) -> Result<Vec<String>> {
            self.check()?;
            Ok(self
                .registered
                .read()
                .await
                .iter()
                .map(|d| d.name.clone())
                .collect())
        }

        async fn register_command(&self, definition: &CommandDefinition) -> Result<()> {
            self.check()?;
            self.registered.write().await.push(definition.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryHost;
    use super::*;

    #[tokio::test]
    async fn test_memory_host_permissions() {
        let host = MemoryHost::new();
        host.grant_manage(ScopeId(1), UserId(10)).await;

        assert!(host.can_manage(UserId(10), ScopeId(1)).await.unwrap());
        assert!(!host.can_manage(UserId(10), ScopeId(2)).await.unwrap());
        assert!(!host.can_manage(UserId(11), ScopeId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_host_replies_in_order() {
        let host = MemoryHost::new();
        host.reply(ChannelId(5), "first").await.unwrap();
        host.reply(ChannelId(6), "second").await.unwrap();

        assert_eq!(
            host.replies().await,
            vec![
                (ChannelId(5), "first".to_string()),
                (ChannelId(6), "second".to_string())
            ]
        );
        assert_eq!(host.last_reply().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_memory_host_failing() {
        let host = MemoryHost::new();
        host.set_failing(true);
        assert!(host.reply(ChannelId(1), "x").await.is_err());
        assert!(host.registered_commands().await.is_err());
    }
}
