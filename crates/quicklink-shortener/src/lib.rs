//! URL shortener service implementation.
//!
//! This crate provides the [`ShortenerService`] and the sequential key
//! generator that feeds it. Core types are re-exported from `quicklink_core`.

pub mod generator;
pub mod service;

pub use generator::seq::{SeqGenerator, SeqSettings};
pub use generator::Generator;
pub use quicklink_core::{MappingEntry, ShortKey, Shortener, ShortenerError};
pub use service::ShortenerService;
