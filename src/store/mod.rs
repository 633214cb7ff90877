//! Durable and in-memory key-value stores for small string payloads.

pub mod disk;
pub mod memory;

use anyhow::Result;

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// Synchronous string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
