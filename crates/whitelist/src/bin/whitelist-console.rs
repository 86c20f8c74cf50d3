//! Operator console for a whitelist directory.
//!
//! Reads commands from stdin, one per line. Lines starting with `/` are
//! structured commands (`/whitelist add mods 1234`); anything else is a
//! legacy text command (`.whitelist add mods 1234`). Replies go to stdout,
//! logs to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use whitelist::router::registration::CommandDefinition;
use whitelist::router::{ChannelId, FrontEnd, ScopeId, UserId};
use whitelist::{CommandContext, Host, InboundMessage, Whitelist, WhitelistConfig};

const OPERATOR: UserId = UserId(0);
const CONSOLE: ChannelId = ChannelId(0);
const LOCAL: ScopeId = ScopeId(0);

#[derive(Parser)]
#[command(name = "whitelist-console")]
#[command(about = "Manage whitelists from the command line")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the list directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the legacy command prefix
    #[arg(long)]
    prefix: Option<String>,
}

/// A host where the operator may do anything and replies are printed.
#[derive(Default)]
struct ConsoleHost {
    registered: Mutex<Vec<String>>,
}

#[async_trait]
impl Host for ConsoleHost {
    async fn can_manage(&self, _caller: UserId, _scope: ScopeId) -> whitelist::router::Result<bool> {
        Ok(true)
    }

    async fn reply(&self, _channel: ChannelId, text: &str) -> whitelist::router::Result<()> {
        println!("{}", text);
        Ok(())
    }

    async fn registered_commands(&self) -> whitelist::router::Result<Vec<String>> {
        Ok(self.registered.lock().await.clone())
    }

    async fn register_command(
        &self,
        definition: &CommandDefinition,
    ) -> whitelist::router::Result<()> {
        info!(name = %definition.name, "registered command");
        self.registered.lock().await.push(definition.name.clone());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WhitelistConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WhitelistConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }

    info!(data_dir = %config.data_dir.display(), "opening whitelist store");
    let service = Whitelist::open(config, Arc::new(ConsoleHost::default()))
        .context("failed to open whitelist store")?;
    service.start().await?;

    let context = CommandContext::scoped(OPERATOR, CONSOLE, LOCAL);
    let router = service.router();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('/') {
            match router.structured().from_text(line) {
                Ok(command) => {
                    service.handle_command(&context, &command).await?;
                }
                Err(e) => {
                    debug!(error = %e, "unrecognized structured command");
                    println!("{}", router.structured().usage());
                }
            }
        } else {
            let message = InboundMessage {
                context: context.clone(),
                content: line.to_string(),
            };
            if service.handle_message(&message).await?.is_none() {
                println!("{}", router.legacy().usage());
            }
        }
    }

    Ok(())
}
