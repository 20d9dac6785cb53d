//! Core types and traits for the QuickLink URL shortener.
//!
//! This crate provides the types shared by the storage backends and the
//! shortener service: the [`ShortKey`] identifier, the error taxonomy, the
//! URL validity predicate and the repository/shortener traits.

pub mod error;
pub mod repository;
pub mod shortener;
pub mod shortkey;
pub mod validator;

pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{MappingEntry, ReadRepository, Repository};
pub use shortener::Shortener;
pub use shortkey::{ShortKey, DEFAULT_NAMESPACE};
pub use validator::is_valid;
