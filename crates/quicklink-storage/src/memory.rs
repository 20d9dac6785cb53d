use async_trait::async_trait;
use dashmap::DashMap;
use quicklink_core::repository::Result;
use quicklink_core::{MappingEntry, ReadRepository, Repository, ShortKey, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Volatile implementation of the Repository trait using DashMap.
///
/// Nothing is written to disk. Each entry carries an insertion sequence so
/// [`ReadRepository::entries`] can still report insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortKey, (u64, String)>,
    sequence: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, key: &ShortKey) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|slot| slot.1.clone()))
    }

    async fn exists(&self, key: &ShortKey) -> Result<bool> {
        Ok(self.storage.contains_key(key))
    }

    async fn entries(&self) -> Result<Vec<MappingEntry>> {
        let mut slots: Vec<(u64, MappingEntry)> = self
            .storage
            .iter()
            .map(|slot| {
                let (seq, url) = slot.value();
                (*seq, MappingEntry::new(slot.key().clone(), url.clone()))
            })
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        Ok(slots.into_iter().map(|(_, entry)| entry).collect())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, entry: MappingEntry) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.storage.entry(entry.short_key) {
            Entry::Occupied(occupied) => Err(StorageError::Conflict(occupied.key().to_string())),
            Entry::Vacant(vacant) => {
                let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
                vacant.insert((seq, entry.original_url));
                Ok(())
            }
        }
    }
}
