pub mod codec;
pub mod file;
pub mod memory;

pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use quicklink_core::{MappingEntry, ReadRepository, Repository, StorageError};
