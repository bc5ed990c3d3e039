pub mod json_backend;
pub mod memory;

use crate::core::errors::Result;

/// Key under which the whole budget store is persisted.
pub const STORAGE_KEY: &str = "budgetAppStateV2";

/// Synchronous key-value persistence for serialized documents.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Keeps an unreadable value aside before it gets overwritten. Backends
    /// without a place to put it may ignore the call.
    fn quarantine(&self, key: &str, value: &str) -> Result<()> {
        let _ = (key, value);
        Ok(())
    }
}

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;
