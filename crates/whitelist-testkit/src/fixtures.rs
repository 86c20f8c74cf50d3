//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use whitelist::{Whitelist, WhitelistConfig};
use whitelist_core::{ListKey, ObjectId};
use whitelist_router::host::memory::MemoryHost;
use whitelist_router::{ChannelId, CommandContext, InboundMessage, ScopeId, UserId};
use whitelist_store::{AllowListStore, DirectoryPersistence, DEFAULT_EXTENSION};

/// A caller with management privilege in [`SCOPE`] (see [`admin_host`]).
pub const ADMIN: UserId = UserId(1);
/// A caller without privilege.
pub const MEMBER: UserId = UserId(2);
/// The scope every fixture context lives in.
pub const SCOPE: ScopeId = ScopeId(1);
/// The channel every fixture context replies to.
pub const CHANNEL: ChannelId = ChannelId(1);

/// A temporary list directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestFixture {
    dir: TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty data directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("Whitelist")).expect("create data dir");
        Self { dir }
    }

    /// Create a fixture pre-populated with `(file name, contents)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fixture = Self::new();
        for (name, contents) in files {
            fixture.seed_file(name, contents);
        }
        fixture
    }

    /// The list directory.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("Whitelist")
    }

    /// Write a raw file into the list directory.
    pub fn seed_file(&self, name: &str, contents: &str) {
        fs::write(self.data_dir().join(name), contents).expect("seed file");
    }

    /// Path of the file backing `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{}.{}", key, DEFAULT_EXTENSION))
    }

    /// Whether a file backs `key`.
    pub fn file_exists(&self, key: &str) -> bool {
        self.file_path(key).is_file()
    }

    /// Ids recorded in the file backing `key`, sorted; `None` if absent.
    pub fn read_list(&self, key: &str) -> Option<Vec<u64>> {
        let contents = fs::read_to_string(self.file_path(key)).ok()?;
        let mut ids: Vec<u64> = contents
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect();
        ids.sort_unstable();
        Some(ids)
    }

    /// Names of every entry in the list directory, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.data_dir())
            .expect("list data dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Open a store over the list directory.
    pub fn open_store(&self) -> AllowListStore<DirectoryPersistence> {
        let persistence =
            DirectoryPersistence::open(self.data_dir(), DEFAULT_EXTENSION).expect("open dir");
        AllowListStore::open(persistence).expect("open store")
    }

    /// A service config pointing at the list directory.
    pub fn config(&self) -> WhitelistConfig {
        WhitelistConfig {
            data_dir: self.data_dir(),
            ..WhitelistConfig::default()
        }
    }

    /// Open the full service over the list directory.
    pub fn open_service(
        &self,
        host: Arc<MemoryHost>,
    ) -> Whitelist<DirectoryPersistence, MemoryHost> {
        Whitelist::open(self.config(), host).expect("open service")
    }

    /// The temp root (parent of the list directory).
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A host where [`ADMIN`] may manage [`SCOPE`].
pub async fn admin_host() -> Arc<MemoryHost> {
    let host = Arc::new(MemoryHost::new());
    host.grant_manage(SCOPE, ADMIN).await;
    host
}

/// A privileged caller's context.
pub fn admin_context() -> CommandContext {
    CommandContext::scoped(ADMIN, CHANNEL, SCOPE)
}

/// An unprivileged caller's context.
pub fn member_context() -> CommandContext {
    CommandContext::scoped(MEMBER, CHANNEL, SCOPE)
}

/// A text message from [`ADMIN`].
pub fn admin_message(content: &str) -> InboundMessage {
    InboundMessage {
        context: admin_context(),
        content: content.to_string(),
    }
}

/// Shorthand for a known-valid key.
pub fn key(s: &str) -> ListKey {
    ListKey::new(s).expect("valid key")
}

/// Shorthand for an id.
pub fn id(n: u64) -> ObjectId {
    ObjectId(n)
}
