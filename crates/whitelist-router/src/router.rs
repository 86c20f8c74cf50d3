//! The command router.
//!
//! Takes an inbound request from either front-end, gates it on the caller's
//! context and privilege, turns it into exactly one store call, and replies
//! on the channel it came from.
//!
//! ```text
//! inbound ──> context? ──> can_manage? ──> parse ──> execute ──> render ──> reply
//!               │ no           │ no          │ err       │ err
//!               v              v             v           v
//!         CONTEXT_REQUIRED  PERMISSION_   usage()   store_failure()
//!                            DENIED
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use whitelist_core::{Command, Outcome};
use whitelist_store::{AddResult, AllowListStore, Listing, Persistence, RemoveResult, StoreError};

use crate::error::Result;
use crate::frontend::FrontEnd;
use crate::host::{CommandContext, Host};
use crate::legacy::{LegacyFrontEnd, DEFAULT_PREFIX};
use crate::registration::{ensure_registered, whitelist_command, CommandDefinition, Registration};
use crate::response::{self, CONTEXT_REQUIRED, PERMISSION_DENIED};
use crate::structured::{SlashCommand, StructuredFrontEnd};

/// Configuration for the router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Prefix of legacy text commands.
    pub prefix: String,
    /// Command word shared by both front-ends.
    pub command_name: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            command_name: "whitelist".to_string(),
        }
    }
}

/// A text message delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub context: CommandContext,
    pub content: String,
}

/// Routes commands from both front-ends into one store.
pub struct Router<P: Persistence, H: Host> {
    store: Arc<AllowListStore<P>>,
    host: Arc<H>,
    legacy: LegacyFrontEnd,
    structured: StructuredFrontEnd,
}

impl<P: Persistence, H: Host> Router<P, H> {
    /// Create a router over `store`, replying through `host`.
    pub fn new(store: Arc<AllowListStore<P>>, host: Arc<H>, config: &RouterConfig) -> Self {
        Self {
            store,
            host,
            legacy: LegacyFrontEnd::new(&config.prefix, &config.command_name),
            structured: StructuredFrontEnd::new(&config.command_name),
        }
    }

    /// The store this router mutates.
    pub fn store(&self) -> &Arc<AllowListStore<P>> {
        &self.store
    }

    /// The host this router replies through.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// The legacy text front-end.
    pub fn legacy(&self) -> &LegacyFrontEnd {
        &self.legacy
    }

    /// The structured front-end.
    pub fn structured(&self) -> &StructuredFrontEnd {
        &self.structured
    }

    /// The structured command definition this router answers to.
    pub fn definition(&self) -> CommandDefinition {
        whitelist_command(self.structured.command_name())
    }

    /// Register the structured command with the host, once.
    pub async fn register(&self) -> Result<Registration> {
        ensure_registered(self.host.as_ref(), &self.definition()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a text message.
    ///
    /// Returns `None` without replying if the message is from a bot or is not
    /// addressed to this command; otherwise replies and returns the reply.
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<Option<String>> {
        if message.context.caller_is_bot || !self.legacy.is_addressed(&message.content) {
            return Ok(None);
        }

        let text = self
            .respond(&self.legacy, &message.context, message.content.as_str())
            .await?;
        self.host.reply(message.context.channel, &text).await?;
        Ok(Some(text))
    }

    /// Handle a structured command, reply, and return the reply.
    pub async fn handle_command(
        &self,
        context: &CommandContext,
        command: &SlashCommand,
    ) -> Result<String> {
        let text = self.respond(&self.structured, context, command).await?;
        self.host.reply(context.channel, &text).await?;
        Ok(text)
    }

    async fn respond<F: FrontEnd>(
        &self,
        front_end: &F,
        context: &CommandContext,
        input: &F::Input,
    ) -> Result<String> {
        let Some(scope) = context.scope else {
            debug!(caller = context.caller.0, "rejected command outside a scoped context");
            return Ok(CONTEXT_REQUIRED.to_string());
        };

        if !self.host.can_manage(context.caller, scope).await? {
            debug!(caller = context.caller.0, %scope, "rejected command from unprivileged caller");
            return Ok(PERMISSION_DENIED.to_string());
        }

        let command = match front_end.parse(input) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "rejected malformed command");
                return Ok(front_end.usage());
            }
        };

        match self.execute(&command) {
            Ok(outcome) => Ok(front_end.render(&outcome)),
            Err(e) => {
                error!(error = %e, ?command, "failed to apply command");
                Ok(response::store_failure(command.key(), &e))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply `command` to the store with exactly one store call.
    pub fn execute(&self, command: &Command) -> std::result::Result<Outcome, StoreError> {
        match command {
            Command::Add { key, id } => {
                let result = self.store.add(key, *id)?;
                Ok(Outcome::Added {
                    key: key.clone(),
                    id: *id,
                    inserted: result == AddResult::Inserted,
                })
            }
            Command::Remove { key, id } => {
                let result = self.store.remove(key, *id)?;
                Ok(Outcome::Removed {
                    key: key.clone(),
                    id: *id,
                    list_deleted: result == RemoveResult::ListDeleted,
                })
            }
            Command::RemoveAll { key } => {
                let existed = self.store.remove_all(key)?;
                Ok(Outcome::RemovedAll {
                    key: key.clone(),
                    existed,
                })
            }
            Command::List => Ok(Outcome::Keys(self.store.list_keys())),
            Command::ListDetail { key } => match self.store.list_detail(key.as_str()) {
                Listing::Members(members) => Ok(Outcome::Members {
                    key: key.clone(),
                    members,
                }),
                Listing::Keys(keys) => Ok(Outcome::Keys(keys)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::host::{ChannelId, ScopeId, UserId};
    use crate::structured::{OptionValue, ADD_CHANNEL, ADD_SELECT, LIST_NAME};
    use whitelist_core::{ListKey, ObjectId};
    use whitelist_store::MemoryPersistence;

    const SCOPE: ScopeId = ScopeId(1);
    const ADMIN: UserId = UserId(10);
    const MEMBER: UserId = UserId(20);
    const CHANNEL: ChannelId = ChannelId(100);

    async fn router() -> Router<MemoryPersistence, MemoryHost> {
        let store = Arc::new(AllowListStore::open(MemoryPersistence::new()).unwrap());
        let host = Arc::new(MemoryHost::new());
        host.grant_manage(SCOPE, ADMIN).await;
        Router::new(store, host, &RouterConfig::default())
    }

    fn message(caller: UserId, content: &str) -> InboundMessage {
        InboundMessage {
            context: CommandContext::scoped(caller, CHANNEL, SCOPE),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_legacy_add_and_remove() {
        let router = router().await;

        let reply = router
            .handle_message(&message(ADMIN, ".whitelist add mods 111"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Added 111 to mods"));
        assert!(router.store().query("mods", ObjectId(111)));

        let reply = router
            .handle_message(&message(ADMIN, ".whitelist remove mods 111"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Removed 111 from mods"));
        assert!(router.store().is_empty());

        assert_eq!(
            router.host().replies().await,
            vec![
                (CHANNEL, "Added 111 to mods".to_string()),
                (CHANNEL, "Removed 111 from mods".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_legacy_remove_all() {
        let router = router().await;
        router
            .handle_message(&message(ADMIN, ".whitelist add mods 1"))
            .await
            .unwrap();

        let reply = router
            .handle_message(&message(ADMIN, ".whitelist remove mods all"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Removed key mods"));
        assert!(!router.store().contains_key("mods"));
    }

    #[tokio::test]
    async fn test_legacy_malformed_does_not_mutate() {
        let router = router().await;

        let reply = router
            .handle_message(&message(ADMIN, ".whitelist add onlykey"))
            .await
            .unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("Error processing command, usage: .whitelist [add|remove] [key] [all|objectID]")
        );
        assert!(router.store().is_empty());
        assert_eq!(router.store().persistence().write_count(), 0);
    }

    #[tokio::test]
    async fn test_run_together_trigger_gets_usage() {
        let router = router().await;

        let reply = router
            .handle_message(&message(ADMIN, ".whitelistadd mods 1"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some(router.legacy().usage().as_str()));
        assert!(router.store().is_empty());
    }

    #[tokio::test]
    async fn test_ignores_unaddressed_and_bot_messages() {
        let router = router().await;

        assert_eq!(
            router.handle_message(&message(ADMIN, "hello there")).await.unwrap(),
            None
        );

        let mut from_bot = message(ADMIN, ".whitelist add mods 1");
        from_bot.context.caller_is_bot = true;
        assert_eq!(router.handle_message(&from_bot).await.unwrap(), None);

        assert!(router.host().replies().await.is_empty());
        assert!(router.store().is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let router = router().await;

        let reply = router
            .handle_message(&message(MEMBER, ".whitelist add mods 1"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some(PERMISSION_DENIED));
        assert!(router.store().is_empty());
    }

    #[tokio::test]
    async fn test_context_required() {
        let router = router().await;
        let context = CommandContext::unscoped(ADMIN, CHANNEL);

        let reply = router
            .handle_command(&context, &SlashCommand::new("whitelist", "list"))
            .await
            .unwrap();
        assert_eq!(reply, CONTEXT_REQUIRED);

        let dm = InboundMessage {
            context,
            content: ".whitelist add mods 1".to_string(),
        };
        assert_eq!(
            router.handle_message(&dm).await.unwrap().as_deref(),
            Some(CONTEXT_REQUIRED)
        );
        assert!(router.store().is_empty());
    }

    #[tokio::test]
    async fn test_structured_add_and_list() {
        let router = router().await;
        let context = CommandContext::scoped(ADMIN, CHANNEL, SCOPE);

        let add = SlashCommand::new("whitelist", "add")
            .with_option(ADD_SELECT, OptionValue::String("mods".into()))
            .with_option(ADD_CHANNEL, OptionValue::Channel(42));
        assert_eq!(
            router.handle_command(&context, &add).await.unwrap(),
            "Added <#42> to whitelist `mods`"
        );

        let list_all = SlashCommand::new("whitelist", "list");
        assert_eq!(
            router.handle_command(&context, &list_all).await.unwrap(),
            "Whitelists: `mods`"
        );

        let list_mods = SlashCommand::new("whitelist", "list")
            .with_option(LIST_NAME, OptionValue::String("mods".into()));
        assert_eq!(
            router.handle_command(&context, &list_mods).await.unwrap(),
            "42 (<#42>)"
        );

        let list_unknown = SlashCommand::new("whitelist", "list")
            .with_option(LIST_NAME, OptionValue::String("ghost".into()));
        assert_eq!(
            router.handle_command(&context, &list_unknown).await.unwrap(),
            "Whitelists: `mods`"
        );
    }

    #[tokio::test]
    async fn test_structured_destroy_confirms_regardless() {
        let router = router().await;
        let context = CommandContext::scoped(ADMIN, CHANNEL, SCOPE);

        let destroy = router
            .structured()
            .from_text("/whitelist destroy ghost")
            .unwrap();
        assert_eq!(
            router.handle_command(&context, &destroy).await.unwrap(),
            "Deleted whitelist `ghost`"
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let router = router().await;
        router.store().persistence().set_fail_writes(true);

        let reply = router
            .handle_message(&message(ADMIN, ".whitelist add mods 1"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.starts_with("Failed to update whitelist `mods`:"));
        assert!(!router.store().contains_key("mods"));
    }

    #[tokio::test]
    async fn test_host_failure_propagates() {
        let router = router().await;
        router.host().set_failing(true);

        assert!(router
            .handle_message(&message(ADMIN, ".whitelist add mods 1"))
            .await
            .is_err());
        assert!(router.store().is_empty());
    }

    #[tokio::test]
    async fn test_register_once() {
        let router = router().await;
        assert_eq!(router.register().await.unwrap(), Registration::Registered);
        assert_eq!(
            router.register().await.unwrap(),
            Registration::AlreadyRegistered
        );
        assert_eq!(router.host().registrations().await.len(), 1);
    }

    #[test]
    fn test_execute_list_detail_sorted() {
        let store = Arc::new(AllowListStore::open(MemoryPersistence::new()).unwrap());
        let key = ListKey::new("mods").unwrap();
        for id in [3, 1, 2] {
            store.add(&key, ObjectId(id)).unwrap();
        }
        let router = Router::new(store, Arc::new(MemoryHost::new()), &RouterConfig::default());

        assert_eq!(
            router.execute(&Command::ListDetail { key: key.clone() }).unwrap(),
            Outcome::Members {
                key: key.clone(),
                members: vec![ObjectId(1), ObjectId(2), ObjectId(3)]
            }
        );
        assert_eq!(
            router
                .execute(&Command::ListDetail {
                    key: ListKey::new("ghost").unwrap()
                })
                .unwrap(),
            Outcome::Keys(vec![key])
        );
    }
}
