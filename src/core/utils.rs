use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::errors::Result;

const HOME_ENV: &str = "MONTHLY_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".monthly_budget";
const STORAGE_DIR: &str = "storage";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_TABLES_FILE: &str = "default_tables.json";
const TMP_SUFFIX: &str = "tmp";

/// Resolves the on-disk layout of the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory: `MONTHLY_BUDGET_HOME` when set, otherwise
    /// `~/.monthly_budget`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    /// Directory holding one file per storage key.
    pub fn storage_dir_in(base: &Path) -> PathBuf {
        base.join(STORAGE_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    /// Location of the default tables template when the config does not override it.
    pub fn default_tables_in(base: &Path) -> PathBuf {
        base.join(DEFAULT_TABLES_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling file a write goes through before replacing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to the temp sibling then renames it over `path`, so a
/// failed write never leaves `path` half written.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
