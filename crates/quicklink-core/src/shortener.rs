use crate::repository::MappingEntry;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates `original_url`, mints a fresh short key for it and persists
    /// the full mapping table.
    async fn shorten(&self, original_url: &str) -> Result<ShortKey>;

    /// Resolves an exact short key to its original URL.
    /// Returns `Err(NotFound)` if the key is empty or unknown.
    async fn resolve(&self, key: &str) -> Result<String>;

    /// Lists every mapping currently held.
    async fn list(&self) -> Result<Vec<MappingEntry>>;
}
