use crate::shortkey::ShortKey;
use thiserror::Error;

/// Errors related to the core types of the URL shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short key: {0}")]
    InvalidShortKey(String),
}

/// Errors raised by a repository backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("short key already exists: {0}")]
    Conflict(String),
    /// The durable representation could not be read or rewritten.
    ///
    /// When returned from an insert, the entry has already been applied to
    /// the in-memory table.
    #[error("durable store failed: {0}")]
    Persistence(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors surfaced to callers of [`Shortener`](crate::Shortener).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short key not found: {0:?}")]
    NotFound(String),
    /// The key generator cannot mint another key without reusing a value.
    #[error("short key space is exhausted")]
    Exhausted,
    /// Reading or rewriting the durable store failed.
    ///
    /// `assigned` carries the key that was committed in memory before the
    /// rewrite failed. That key stays resolvable for the rest of the process.
    #[error("persistence failed: {reason}")]
    Persistence {
        assigned: Option<ShortKey>,
        reason: String,
    },
}

impl ShortenerError {
    /// Returns the key that was assigned despite a persistence failure.
    pub fn assigned_key(&self) -> Option<&ShortKey> {
        match self {
            ShortenerError::Persistence { assigned, .. } => assigned.as_ref(),
            _ => None,
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        Self::Persistence {
            assigned: None,
            reason: value.to_string(),
        }
    }
}
