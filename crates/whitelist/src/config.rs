//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use whitelist_router::{RouterConfig, DEFAULT_PREFIX};
use whitelist_store::DEFAULT_EXTENSION;

use crate::error::{Result, WhitelistError};

/// Configuration for the whitelist service.
///
/// Every field has a default, so `{}` is a complete document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistConfig {
    /// Directory holding one file per list.
    pub data_dir: PathBuf,
    /// Extension of list files, without the dot.
    pub extension: String,
    /// Prefix of legacy text commands.
    pub prefix: String,
    /// Command word shared by both front-ends.
    pub command_name: String,
    /// Whether to register the structured command when starting.
    pub register_on_startup: bool,
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Whitelist"),
            extension: DEFAULT_EXTENSION.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            command_name: "whitelist".to_string(),
            register_on_startup: true,
        }
    }
}

impl WhitelistConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| WhitelistError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The router settings carried by this config.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            prefix: self.prefix.clone(),
            command_name: self.command_name.clone(),
        }
    }
}
