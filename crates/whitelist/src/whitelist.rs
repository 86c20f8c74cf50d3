//! The whitelist service: store, router and host wired together.

use std::sync::Arc;

use tracing::info;
use whitelist_core::ObjectId;
use whitelist_router::{CommandContext, Host, InboundMessage, Router, SlashCommand};
use whitelist_store::{AccessQuery, AllowListStore, DirectoryPersistence, Persistence};

use crate::config::WhitelistConfig;
use crate::error::Result;

/// The whitelist service.
///
/// Owns the single store instance for the process. Command handlers mutate
/// it through the router; other subsystems read it through [`AccessQuery`].
pub struct Whitelist<P: Persistence, H: Host> {
    config: WhitelistConfig,
    router: Router<P, H>,
}

impl<H: Host> Whitelist<DirectoryPersistence, H> {
    /// Open the service over the directory named in `config`.
    pub fn open(config: WhitelistConfig, host: Arc<H>) -> Result<Self> {
        let persistence = DirectoryPersistence::open(&config.data_dir, &config.extension)?;
        Self::with_persistence(config, persistence, host)
    }
}

impl<P: Persistence, H: Host> Whitelist<P, H> {
    /// Open the service over an explicit persistence backend.
    pub fn with_persistence(config: WhitelistConfig, persistence: P, host: Arc<H>) -> Result<Self> {
        let store = Arc::new(AllowListStore::open(persistence)?);
        let router = Router::new(store, host, &config.router_config());
        Ok(Self { config, router })
    }

    /// Finish startup, registering the structured command if configured.
    pub async fn start(&self) -> Result<()> {
        if self.config.register_on_startup {
            let registration = self.router.register().await?;
            info!(
                command = %self.config.command_name,
                ?registration,
                "structured command registration"
            );
        }
        info!(lists = self.store().len(), "whitelist service started");
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &WhitelistConfig {
        &self.config
    }

    /// The router.
    pub fn router(&self) -> &Router<P, H> {
        &self.router
    }

    /// The store.
    pub fn store(&self) -> &Arc<AllowListStore<P>> {
        self.router.store()
    }

    /// Re-read every list from persistence.
    pub fn reload(&self) -> Result<usize> {
        Ok(self.store().reload()?)
    }

    /// Whether `object_id` is allowed under `key`.
    pub fn object_ok(&self, key: &str, object_id: u64) -> bool {
        self.store().query(key, ObjectId(object_id))
    }

    /// A shareable read-only handle for other subsystems.
    pub fn access(&self) -> Arc<dyn AccessQuery>
    where
        P: 'static,
    {
        self.store().clone()
    }

    /// Handle a text message; `None` when it was not for us.
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<Option<String>> {
        Ok(self.router.handle_message(message).await?)
    }

    /// Handle a structured command.
    pub async fn handle_command(
        &self,
        context: &CommandContext,
        command: &SlashCommand,
    ) -> Result<String> {
        Ok(self.router.handle_command(context, command).await?)
    }
}

impl<P: Persistence, H: Host> AccessQuery for Whitelist<P, H> {
    fn object_ok(&self, key: &str, object_id: u64) -> bool {
        Whitelist::object_ok(self, key, object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WhitelistError;
    use whitelist_router::host::memory::MemoryHost;
    use whitelist_router::{ChannelId, ScopeId, UserId};
    use whitelist_store::StoreError;

    fn config_in(dir: &tempfile::TempDir) -> WhitelistConfig {
        WhitelistConfig {
            data_dir: dir.path().join("Whitelist"),
            ..WhitelistConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_creates_directory_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(MemoryHost::new());
        let service = Whitelist::open(config_in(&dir), host.clone()).unwrap();

        assert!(dir.path().join("Whitelist").is_dir());

        service.start().await.unwrap();
        service.start().await.unwrap();
        assert_eq!(host.registrations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_start_without_registration() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(MemoryHost::new());
        let config = WhitelistConfig {
            register_on_startup: false,
            ..config_in(&dir)
        };
        let service = Whitelist::open(config, host.clone()).unwrap();

        service.start().await.unwrap();
        assert!(host.registrations().await.is_empty());
    }

    #[test]
    fn test_open_rejects_multi_part_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = WhitelistConfig {
            extension: "list.txt".to_string(),
            ..config_in(&dir)
        };

        let result = Whitelist::open(config, Arc::new(MemoryHost::new()));
        assert!(matches!(
            result,
            Err(WhitelistError::Store(StoreError::InvalidExtension(_)))
        ));
    }

    #[tokio::test]
    async fn test_access_handle_sees_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(MemoryHost::new());
        host.grant_manage(ScopeId(1), UserId(1)).await;
        let service = Whitelist::open(config_in(&dir), host).unwrap();
        let access = service.access();

        assert!(!access.object_ok("mods", 7));

        let message = InboundMessage {
            context: CommandContext::scoped(UserId(1), ChannelId(2), ScopeId(1)),
            content: ".whitelist add mods 7".to_string(),
        };
        service.handle_message(&message).await.unwrap();

        assert!(access.object_ok("mods", 7));
        assert!(AccessQuery::object_ok(&service, "mods", 7));
    }
}
