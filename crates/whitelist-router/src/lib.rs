//! # Whitelist Router
//!
//! Command front-ends and routing for the whitelist store.
//!
//! ## Overview
//!
//! Two front-ends drive one store:
//!
//! - [`LegacyFrontEnd`] - inline text, `.whitelist add <key> <id>`
//! - [`StructuredFrontEnd`] - platform-native `/whitelist <sub> ...`
//!
//! Both parse into the shared [`Command`](whitelist_core::Command). The
//! [`Router`] gates each request on context and privilege (delegated to the
//! [`Host`]), executes it against the store and replies.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use whitelist_router::{CommandContext, InboundMessage, Router, RouterConfig};
//! use whitelist_router::{ChannelId, ScopeId, UserId};
//! use whitelist_router::host::memory::MemoryHost;
//! use whitelist_store::{AllowListStore, MemoryPersistence};
//!
//! async fn example() {
//!     let store = Arc::new(AllowListStore::open(MemoryPersistence::new()).unwrap());
//!     let host = Arc::new(MemoryHost::new());
//!     let router = Router::new(store, host, &RouterConfig::default());
//!
//!     router.register().await.unwrap();
//!
//!     let message = InboundMessage {
//!         context: CommandContext::scoped(UserId(1), ChannelId(2), ScopeId(3)),
//!         content: ".whitelist add mods 111".into(),
//!     };
//!     let reply = router.handle_message(&message).await.unwrap();
//! }
//! ```

pub mod error;
pub mod frontend;
pub mod host;
pub mod legacy;
pub mod registration;
pub mod response;
pub mod router;
pub mod structured;

pub use error::{ParseError, Result, RouterError};
pub use frontend::FrontEnd;
pub use host::{ChannelId, CommandContext, Host, ScopeId, UserId};
pub use legacy::{LegacyFrontEnd, DEFAULT_PREFIX};
pub use registration::{
    ensure_registered, whitelist_command, CommandDefinition, OptionDefinition, OptionKind,
    Registration, SubcommandDefinition,
};
pub use router::{InboundMessage, Router, RouterConfig};
pub use structured::{CommandOption, OptionValue, SlashCommand, StructuredFrontEnd};
