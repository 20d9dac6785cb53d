use crate::error::StorageError;
use crate::shortkey::ShortKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// One `(short key, original URL)` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub short_key: ShortKey,
    pub original_url: String,
}

impl MappingEntry {
    pub fn new(short_key: ShortKey, original_url: impl Into<String>) -> Self {
        Self {
            short_key,
            original_url: original_url.into(),
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the original URL for a given short key.
    /// Returns `None` if the key does not exist.
    async fn get(&self, key: &ShortKey) -> Result<Option<String>>;

    /// Checks whether a short key already exists in the repository.
    async fn exists(&self, key: &ShortKey) -> Result<bool>;

    /// Returns every entry, in insertion order where the backend keeps one.
    async fn entries(&self) -> Result<Vec<MappingEntry>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new entry. Returns `Err(Conflict)` if the key already exists.
    ///
    /// Durable backends may return `Err(Persistence)` after the entry has
    /// been applied in memory; the entry is not rolled back.
    async fn insert(&self, entry: MappingEntry) -> Result<()>;
}
