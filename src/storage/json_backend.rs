use std::{fs, path::PathBuf};

use crate::core::{
    errors::BudgetError,
    utils::{ensure_dir, write_atomic, PathResolver},
};

use super::{Result, StorageBackend};

const CORRUPT_SUFFIX: &str = "corrupt";

/// Stores each key as a JSON file inside the storage directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Opens the storage directory under `base` (the application data
    /// directory when `None`), creating it if needed.
    pub fn new(base: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        let root = PathResolver::storage_dir_in(&base);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn item_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", canonical_name(key)))
    }

    pub fn quarantine_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}.json", canonical_name(key), CORRUPT_SUFFIX))
    }
}

impl StorageBackend for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }
        match String::from_utf8(fs::read(&path)?) {
            Ok(text) => Ok(Some(text)),
            Err(err) => {
                // Keep the raw bytes: the next save replaces the original.
                self.keep_aside(key, err.as_bytes())?;
                Err(BudgetError::StorageError(format!(
                    "{} is not valid UTF-8",
                    path.display()
                )))
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        write_atomic(&self.item_path(key), value.as_bytes())
    }

    fn quarantine(&self, key: &str, value: &str) -> Result<()> {
        self.keep_aside(key, value.as_bytes())
    }
}

impl JsonFileStorage {
    fn keep_aside(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.quarantine_path(key);
        write_atomic(&path, data)?;
        tracing::warn!(path = %path.display(), "unreadable budget state kept aside");
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "state".into()
    } else {
        sanitized
    }
}
