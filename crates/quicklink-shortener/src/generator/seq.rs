use crate::generator::Generator;
use quicklink_core::{ShortKey, DEFAULT_NAMESPACE};
use std::sync::atomic::{AtomicU64, Ordering};
use typed_builder::TypedBuilder;

/// Configures a [`SeqGenerator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SeqSettings {
    /// Literal prefix of every minted key.
    #[builder(default = DEFAULT_NAMESPACE.to_string(), setter(into))]
    pub namespace: String,
    /// Counter value used for the first key. Values below 1 are raised to 1.
    #[builder(default = 1)]
    pub start: u64,
}

/// Sequential key generator: `namespace` followed by an unpadded counter.
///
/// The counter starts at 1 by default and only moves forward. Keys recovered
/// from storage are fed through [`Generator::observe`], which pushes the
/// counter past their numeric suffix. The value `u64::MAX` is never minted:
/// once the counter reaches it the generator is exhausted.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    namespace: String,
}

impl SeqGenerator {
    pub fn new(settings: SeqSettings) -> Self {
        Self {
            counter: AtomicU64::new(settings.start.max(1)),
            namespace: settings.namespace,
        }
    }

    /// Creates a generator for `namespace`, starting at 1.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self::new(SeqSettings::builder().namespace(namespace).build())
    }

    /// Returns the counter value the next key will carry.
    pub fn peek(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new(SeqSettings::builder().build())
    }
}

impl Generator for SeqGenerator {
    type Output = ShortKey;

    fn generate(&self) -> Option<ShortKey> {
        let value = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| value.checked_add(1))
            .ok()?;
        Some(ShortKey::minted(&self.namespace, value))
    }

    fn observe(&self, key: &ShortKey) {
        if let Some(value) = key.numeric_suffix(&self.namespace) {
            self.counter.fetch_max(value.saturating_add(1), Ordering::SeqCst);
        }
    }
}
