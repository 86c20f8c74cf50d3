//! Directory implementation of the Persistence trait.
//!
//! This is the primary backend. Each list lives in its own file,
//! `<root>/<key>.<ext>`, holding one decimal identifier per line, so an
//! operator can inspect or hand-edit a single list with a text editor.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use whitelist_core::{ListKey, ObjectId};

use crate::error::{Result, StoreError};
use crate::traits::{Persistence, Snapshot};

/// Extension used for list files when none is configured.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Per-key file persistence rooted at one directory.
///
/// Only regular files carrying the configured extension are treated as
/// lists; anything else in the directory is left alone.
#[derive(Debug, Clone)]
pub struct DirectoryPersistence {
    root: PathBuf,
    extension: String,
}

impl DirectoryPersistence {
    /// Open a list directory, creating it if it doesn't exist.
    ///
    /// A leading `.` on `extension` is ignored; an empty extension falls back
    /// to [`DEFAULT_EXTENSION`]. The rest must be a single path component
    /// suffix of ASCII letters, digits, `-` or `_`, so that every file written
    /// maps back to its key on load.
    pub fn open(root: impl AsRef<Path>, extension: &str) -> Result<Self> {
        let extension = match extension.trim_start_matches('.') {
            "" => DEFAULT_EXTENSION,
            ext => ext,
        };
        if !is_valid_extension(extension) {
            return Err(StoreError::InvalidExtension(extension.to_string()));
        }

        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::CreateDirectory {
            path: root.clone(),
            source,
        })?;

        Ok(Self {
            root,
            extension: extension.to_string(),
        })
    }

    /// The directory holding the list files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The list file extension, without a leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &ListKey) -> PathBuf {
        self.root.join(format!("{}.{}", key, self.extension))
    }

    /// Path of the staging file used while saving `key`.
    ///
    /// The leading dot makes the stem an invalid key, so a staging file left
    /// behind by a crash is never loaded as a list.
    fn staging_path_for(&self, key: &ListKey) -> PathBuf {
        self.root.join(format!(".{}.{}.tmp", key, self.extension))
    }

    /// Map a directory entry back to its key, if it is a list file.
    fn key_for(&self, path: &Path) -> Option<ListKey> {
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        ListKey::new(path.file_stem()?.to_str()?).ok()
    }
}

impl Persistence for DirectoryPersistence {
    fn load_all(&self) -> Result<Snapshot> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::ListDirectory {
            path: self.root.clone(),
            source,
        })?;

        let mut lists = Snapshot::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::ListDirectory {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(key) = self.key_for(&path) else {
                debug!(path = %path.display(), "ignoring non-list file");
                continue;
            };

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable list file");
                    continue;
                }
            };

            let (members, skipped) = parse_members(&content);
            if skipped > 0 {
                debug!(%key, skipped, "skipped unparseable lines");
            }
            lists.insert(key, members);
        }

        Ok(lists)
    }

    fn save_all(&self, lists: &Snapshot, changed: &ListKey) -> Result<()> {
        // Commit order: unchanged lists first, `changed` last
        let ordered = lists
            .iter()
            .filter(|(key, _)| *key != changed)
            .chain(lists.get_key_value(changed));

        // Stage every list first so a failed write leaves all targets untouched
        let mut staged: Vec<(&ListKey, PathBuf)> = Vec::with_capacity(lists.len());
        for (key, members) in ordered {
            let staging = self.staging_path_for(key);
            if let Err(source) = write_members(&staging, members) {
                let _ = fs::remove_file(&staging);
                discard(&staged);
                return Err(StoreError::Write {
                    key: key.clone(),
                    source,
                });
            }
            staged.push((key, staging));
        }

        // Lists renamed before a failure held content already on disk
        for (i, (key, staging)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(staging, self.path_for(key)) {
                discard(&staged[i..]);
                return Err(StoreError::Write {
                    key: (*key).clone(),
                    source,
                });
            }
        }

        Ok(())
    }

    fn delete_list(&self, key: &ListKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Delete {
                key: key.clone(),
                source,
            }),
        }
    }
}

/// Parse list file content, returning the members and the number of
/// non-blank lines that were not identifiers.
fn parse_members(content: &str) -> (HashSet<ObjectId>, usize) {
    let mut members = HashSet::new();
    let mut skipped = 0;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ObjectId>() {
            Ok(id) => {
                members.insert(id);
            }
            Err(_) => skipped += 1,
        }
    }
    (members, skipped)
}

fn write_members(path: &Path, members: &HashSet<ObjectId>) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for id in members {
        writeln!(writer, "{}", id)?;
    }
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn is_valid_extension(extension: &str) -> bool {
    !extension.is_empty()
        && extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn discard(staged: &[(&ListKey, PathBuf)]) {
    for (_, staging) in staged {
        let _ = fs::remove_file(staging);
    }
}
