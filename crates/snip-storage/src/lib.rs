pub mod memory;

pub use memory::InMemoryRepository;
pub use snip_core::error::{Result, StorageError};
pub use snip_core::repository::{Lookup, ReadRepository, Repository};
