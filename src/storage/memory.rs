use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

use crate::core::errors::BudgetError;

use super::{Result, StorageBackend};

/// In-process storage, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quarantined: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut items) = storage.items.write() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }

    /// Makes every subsequent `set_item` fail, simulating a full or
    /// read-only store.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn quarantined(&self, key: &str) -> Option<String> {
        self.quarantined
            .read()
            .ok()
            .and_then(|items| items.get(key).cloned())
    }
}

fn poisoned() -> BudgetError {
    BudgetError::StorageError("memory storage lock poisoned".into())
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BudgetError::StorageError(format!(
                "storage quota exceeded while writing `{key}`"
            )));
        }
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn quarantine(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.quarantined.write().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
