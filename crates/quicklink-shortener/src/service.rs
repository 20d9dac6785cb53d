use crate::generator::Generator;
use async_trait::async_trait;
use quicklink_core::validator;
use quicklink_core::{MappingEntry, Repository, ShortKey, Shortener, ShortenerError, StorageError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Short key minting
/// - Reporting persistence failures without rolling back
///
/// Shorten calls are serialized by an internal mutex covering
/// "mint + insert + persist". Resolve only takes the repository's read path.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    write_lock: Mutex<()>,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService`, replaying every key already held by
    /// `repository` into `generator` so freshly minted keys cannot collide
    /// with recovered ones.
    pub async fn new(repository: R, generator: G) -> Result<Self> {
        let entries = repository.entries().await?;
        for entry in &entries {
            generator.observe(&entry.short_key);
        }
        info!(recovered = entries.len(), "shortener service ready");

        Ok(Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the generator feeding this service.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn validate_url(url: &str) -> Result<()> {
        validator::validate(url)?;

        // The durable format is line-delimited.
        if url.contains(['\n', '\r']) {
            return Err(ShortenerError::InvalidUrl("URL must fit on a single line".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<ShortKey> {
        Self::validate_url(original_url)?;

        let _guard = self.write_lock.lock().await;
        let key = loop {
            let key: ShortKey = self
                .generator
                .generate()
                .ok_or(ShortenerError::Exhausted)?
                .into();
            if !self.repository.exists(&key).await? {
                break key;
            }
            warn!(key = %key, "minted key is already taken, minting the next one");
        };

        let entry = MappingEntry::new(key.clone(), original_url);
        match self.repository.insert(entry).await {
            Ok(()) => {
                info!(key = %key, url = %original_url, "shortened url");
                Ok(key)
            }
            Err(StorageError::Persistence(reason)) => {
                warn!(key = %key, reason = %reason, "key assigned but not persisted");
                Err(ShortenerError::Persistence {
                    assigned: Some(key),
                    reason,
                })
            }
            Err(StorageError::InvalidData(reason)) => Err(ShortenerError::InvalidUrl(reason)),
            Err(err @ StorageError::Conflict(_)) => Err(err.into()),
        }
    }

    async fn resolve(&self, key: &str) -> Result<String> {
        trace!(key = %key, "resolving short key");

        let not_found = || ShortenerError::NotFound(key.to_string());
        let short_key = ShortKey::new(key).map_err(|_| not_found())?;

        match self.repository.get(&short_key).await? {
            Some(url) => {
                debug!(key = %short_key, url = %url, "resolved short key");
                Ok(url)
            }
            None => {
                trace!(key = %short_key, "short key not found");
                Err(not_found())
            }
        }
    }

    async fn list(&self) -> Result<Vec<MappingEntry>> {
        Ok(self.repository.entries().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::seq::SeqGenerator;
    use quicklink_storage::InMemoryRepository;
    use std::collections::VecDeque;

    async fn test_service() -> ShortenerService<InMemoryRepository, SeqGenerator> {
        ShortenerService::new(InMemoryRepository::new(), SeqGenerator::default())
            .await
            .unwrap()
    }

    /// Hands out a fixed script of keys and ignores recovered ones.
    struct ScriptedGenerator(std::sync::Mutex<VecDeque<&'static str>>);

    impl Generator for ScriptedGenerator {
        type Output = ShortKey;

        fn generate(&self) -> Option<ShortKey> {
            let next = self.0.lock().unwrap().pop_front()?;
            Some(ShortKey::new_unchecked(next))
        }
    }

    #[tokio::test]
    async fn mints_keys_in_sequence() {
        let service = test_service().await;

        let first = service.shorten("http://example.com").await.unwrap();
        let second = service.shorten("https://foo.com/x:y").await.unwrap();

        assert_eq!(first.as_str(), "http://short.ly/1");
        assert_eq!(second.as_str(), "http://short.ly/2");
        assert_eq!(
            service.resolve("http://short.ly/2").await.unwrap(),
            "https://foo.com/x:y"
        );
    }

    #[tokio::test]
    async fn invalid_urls_do_not_mutate() {
        let service = test_service().await;

        for url in ["", "example.com", "ftp://example.com", "http://a.com\nb"] {
            let err = service.shorten(url).await.unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidUrl(_)), "{url:?}");
        }

        assert!(service.list().await.unwrap().is_empty());
        // The counter was not consumed by rejected input.
        assert_eq!(service.generator().peek(), 1);
        assert_eq!(
            service.shorten("http://ok.com").await.unwrap().as_str(),
            "http://short.ly/1"
        );
    }

    #[tokio::test]
    async fn resolve_empty_or_unknown_is_not_found() {
        let service = test_service().await;
        service.shorten("http://example.com").await.unwrap();

        for key in ["", "http://short.ly/2", "HTTP://SHORT.LY/1", "http://short.ly/1 "] {
            let err = service.resolve(key).await.unwrap_err();
            assert_eq!(err, ShortenerError::NotFound(key.to_string()));
        }
    }

    #[tokio::test]
    async fn same_url_gets_a_new_key_each_time() {
        let service = test_service().await;

        let a = service.shorten("http://example.com").await.unwrap();
        let b = service.shorten("http://example.com").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn replays_recovered_keys_into_generator() {
        let repo = InMemoryRepository::new();
        for (key, url) in [("http://short.ly/4", "http://a.com"), ("legacy", "http://b.com")] {
            repo.insert(MappingEntry::new(ShortKey::new_unchecked(key), url))
                .await
                .unwrap();
        }

        let service = ShortenerService::new(repo, SeqGenerator::default())
            .await
            .unwrap();

        let key = service.shorten("http://c.com").await.unwrap();
        assert_eq!(key.as_str(), "http://short.ly/5");
    }

    #[tokio::test]
    async fn conflicting_key_is_skipped() {
        let repo = InMemoryRepository::new();
        repo.insert(MappingEntry::new(ShortKey::new_unchecked("taken"), "http://a.com"))
            .await
            .unwrap();
        let script = VecDeque::from(["taken", "free"]);
        let generator = ScriptedGenerator(std::sync::Mutex::new(script));

        let service = ShortenerService::new(repo, generator).await.unwrap();

        let key = service.shorten("http://b.com").await.unwrap();
        assert_eq!(key.as_str(), "free");
        assert_eq!(service.resolve("taken").await.unwrap(), "http://a.com");
    }

    #[tokio::test]
    async fn exhausted_generator_is_reported_without_mutation() {
        let script = VecDeque::from(["only"]);
        let generator = ScriptedGenerator(std::sync::Mutex::new(script));
        let service = ShortenerService::new(InMemoryRepository::new(), generator)
            .await
            .unwrap();

        service.shorten("http://a.com").await.unwrap();
        let err = service.shorten("http://b.com").await.unwrap_err();

        assert_eq!(err, ShortenerError::Exhausted);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recovered_maximum_suffix_exhausts_instead_of_wrapping() {
        let repo = InMemoryRepository::new();
        let top = ShortKey::minted(quicklink_core::DEFAULT_NAMESPACE, u64::MAX);
        repo.insert(MappingEntry::new(top, "http://a.com"))
            .await
            .unwrap();
        let service = ShortenerService::new(repo, SeqGenerator::default())
            .await
            .unwrap();

        let err = service.shorten("http://b.com").await.unwrap_err();

        assert_eq!(err, ShortenerError::Exhausted);
        assert!(service.resolve("http://short.ly/0").await.is_err());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_shortens_never_share_a_key() {
        let service = Arc::new(test_service().await);
        let mut handles = vec![];

        for i in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .shorten(&format!("https://example{i}.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut keys = vec![];
        for handle in handles {
            keys.push(handle.await.unwrap());
        }
        keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        keys.dedup();
        assert_eq!(keys.len(), 20);
    }
}
