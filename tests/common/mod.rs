#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use monthly_budget::{
    budget::{DefaultTablesConfig, MonthKey},
    core::context::{AppContext, LoadMetadata},
    storage::{JsonFileStorage, STORAGE_KEY},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn month(raw: &str) -> MonthKey {
    raw.parse().expect("valid month key")
}

/// File holding the persisted budget state under `base`.
pub fn state_file(base: &Path) -> PathBuf {
    JsonFileStorage::new(Some(base.to_path_buf()))
        .expect("open storage")
        .item_path(STORAGE_KEY)
}

pub fn write_state(base: &Path, contents: &str) {
    std::fs::write(state_file(base), contents).expect("write state file");
}

/// Opens the file-backed context under `base` with `active` as active month.
pub fn open_context(
    base: &Path,
    defaults: DefaultTablesConfig,
    active: &str,
) -> (AppContext, LoadMetadata) {
    let storage = JsonFileStorage::new(Some(base.to_path_buf())).expect("open storage");
    AppContext::bootstrap(Box::new(storage), defaults, month(active))
}
