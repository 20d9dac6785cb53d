use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Namespace prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "http://short.ly/";

/// Identifier handed out by `shorten` and accepted by `resolve`.
///
/// Minted keys are a namespace prefix followed by an unpadded decimal
/// counter value (`http://short.ly/42`). Keys recovered from a durable store
/// are kept verbatim, whatever their shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(String);

impl ShortKey {
    /// Builds the key for counter `value` under `namespace`.
    pub fn minted(namespace: &str, value: u64) -> Self {
        Self(format!("{namespace}{value}"))
    }

    /// Creates a `ShortKey` after validating the input.
    ///
    /// A key must be non-empty and fit on a single line.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Creates a `ShortKey` without validation.
    ///
    /// Use this only for keys produced by trusted internal sources.
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the short key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the counter value embedded in the key, if the key is
    /// `namespace` followed by decimal digits only.
    pub fn numeric_suffix(&self, namespace: &str) -> Option<u64> {
        let digits = self.0.strip_prefix(namespace)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    fn validate(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CoreError::InvalidShortKey("key cannot be empty".to_string()));
        }

        if key.contains(['\n', '\r']) {
            return Err(CoreError::InvalidShortKey(format!(
                "key must not contain line breaks: {key:?}"
            )));
        }

        Ok(())
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
