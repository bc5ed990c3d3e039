use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{BudgetError, Result},
    utils::{ensure_dir, write_atomic, PathResolver},
};

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "currency",
    "defaults_path",
    "screen_reader_mode",
    "high_contrast_mode",
];

/// User preferences persisted next to the budget data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Default tables template; `default_tables.json` in the data dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults_path: Option<PathBuf>,
    #[serde(default)]
    pub screen_reader_mode: bool,
    #[serde(default)]
    pub high_contrast_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            defaults_path: None,
            screen_reader_mode: false,
            high_contrast_mode: false,
        }
    }
}

impl Config {
    fn default_currency() -> String {
        "EUR".into()
    }

    /// Updates one setting from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency" => {
                let code = value.trim().to_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(BudgetError::ConfigError(format!(
                        "currency must be a three-letter code, got `{value}`"
                    )));
                }
                self.currency = code;
            }
            "defaults_path" => {
                let trimmed = value.trim();
                self.defaults_path = if trimmed.is_empty() || trimmed == "none" {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
            "screen_reader_mode" => self.screen_reader_mode = parse_flag(key, value)?,
            "high_contrast_mode" => self.high_contrast_mode = parse_flag(key, value)?,
            other => {
                return Err(BudgetError::ConfigError(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(BudgetError::ConfigError(format!(
            "`{key}` expects on/off, got `{value}`"
        ))),
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Template location in effect for `config`; relative overrides resolve
    /// against the data directory.
    pub fn defaults_path(&self, config: &Config) -> PathBuf {
        match &config.defaults_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => PathResolver::default_tables_in(&self.base),
        }
    }
}
