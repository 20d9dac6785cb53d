pub mod seq;

use quicklink_core::ShortKey;

/// Trait for minting short keys.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortKey>;

    /// Generates a key that has not been handed out by this generator before.
    ///
    /// Returns `None` once no such key is left.
    fn generate(&self) -> Option<Self::Output>;

    /// Informs the generator of a key recovered from storage, so that later
    /// calls to [`generate`](Generator::generate) do not reproduce it.
    fn observe(&self, _key: &ShortKey) {}
}
