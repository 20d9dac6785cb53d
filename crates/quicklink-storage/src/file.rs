use crate::codec;
use async_trait::async_trait;
use quicklink_core::repository::Result;
use quicklink_core::{MappingEntry, ReadRepository, Repository, ShortKey, StorageError};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Mapping table that remembers insertion order.
#[derive(Debug, Default)]
struct MappingTable {
    entries: Vec<MappingEntry>,
    index: HashMap<ShortKey, usize>,
}

impl MappingTable {
    fn get(&self, key: &ShortKey) -> Option<&MappingEntry> {
        self.index.get(key).map(|&at| &self.entries[at])
    }

    fn contains(&self, key: &ShortKey) -> bool {
        self.index.contains_key(key)
    }

    /// Appends `entry`, or replaces the URL in place when the key is present.
    /// Returns `true` when an existing entry was replaced.
    fn upsert(&mut self, entry: MappingEntry) -> bool {
        match self.index.get(&entry.short_key) {
            Some(&at) => {
                self.entries[at].original_url = entry.original_url;
                true
            }
            None => {
                self.index.insert(entry.short_key.clone(), self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Repository backed by a line-delimited text file.
///
/// The whole file is read once by [`FileRepository::open`] and rewritten in
/// full after every insert. A rewrite goes to a temporary file in the same
/// directory which then replaces the mapping file, so readers see either the
/// old table or the new one. The table write lock is held across the rewrite.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    table: RwLock<MappingTable>,
}

impl FileRepository {
    /// Opens the mapping file at `path` and loads every well-formed line.
    ///
    /// A missing file yields an empty repository. Lines that do not split
    /// into a key and a URL are logged and skipped. A key seen twice keeps
    /// its first position and the URL of its last line.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "mapping file not found, starting empty");
                String::new()
            }
            Err(err) => {
                return Err(StorageError::Persistence(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };

        let mut table = MappingTable::default();
        let mut skipped = 0usize;
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(entry) = codec::decode_line(line) else {
                skipped += 1;
                warn!(path = %path.display(), line = number + 1, "skipping malformed mapping line");
                continue;
            };

            let key = entry.short_key.clone();
            if table.upsert(entry) {
                warn!(
                    path = %path.display(),
                    line = number + 1,
                    key = %key,
                    "duplicate short key, keeping the later url"
                );
            }
        }

        info!(path = %path.display(), loaded = table.len(), skipped, "loaded mapping file");

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Returns the path of the durable file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &MappingTable) -> Result<()> {
        let content = codec::encode(&table.entries);
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, content.as_bytes()))
            .await
            .map_err(|err| StorageError::Persistence(format!("rewrite task failed: {err}")))?
            .map_err(|err| {
                StorageError::Persistence(format!("failed to write {}: {err}", self.path.display()))
            })?;

        debug!(path = %self.path.display(), entries = table.len(), "rewrote mapping file");
        Ok(())
    }
}

/// Writes `content` to a sibling temporary file and renames it over `path`.
fn replace_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[async_trait]
impl ReadRepository for FileRepository {
    async fn get(&self, key: &ShortKey) -> Result<Option<String>> {
        let table = self.table.read().await;
        Ok(table.get(key).map(|entry| entry.original_url.clone()))
    }

    async fn exists(&self, key: &ShortKey) -> Result<bool> {
        Ok(self.table.read().await.contains(key))
    }

    async fn entries(&self) -> Result<Vec<MappingEntry>> {
        Ok(self.table.read().await.entries.clone())
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn insert(&self, entry: MappingEntry) -> Result<()> {
        let line = codec::encode_line(&entry);
        if line.contains(['\n', '\r']) {
            return Err(StorageError::InvalidData(format!(
                "mapping does not fit on one line: {line:?}"
            )));
        }

        let mut table = self.table.write().await;
        if table.contains(&entry.short_key) {
            return Err(StorageError::Conflict(entry.short_key.to_string()));
        }

        table.upsert(entry);
        self.persist(&table).await
    }
}
