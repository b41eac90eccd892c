use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::{CurrencyCode, FormatOptions, LocaleConfig},
    errors::{LedgerError, Result},
    ledger::codec::MalformedLinePolicy,
    utils::persistence::write_atomic,
};

const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// User preferences for presentation, storage, and load behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub format: FormatOptions,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub malformed_lines: MalformedLinePolicy,
    /// `chrono` format string for the date pre-filled on new entries.
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            format: FormatOptions::default(),
            storage: StorageSettings::default(),
            malformed_lines: MalformedLinePolicy::default(),
            date_format: Self::default_date_format(),
        }
    }
}

impl Config {
    pub fn default_date_format() -> String {
        DEFAULT_DATE_FORMAT.into()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    File,
    Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "StorageSettings::default_file_name")]
    pub file_name: String,
    #[serde(default = "StorageSettings::default_preference_file")]
    pub preference_file: String,
    #[serde(default = "StorageSettings::default_preference_key")]
    pub preference_key: String,
}

impl StorageSettings {
    fn default_file_name() -> String {
        "allowance_list.txt".into()
    }

    fn default_preference_file() -> String {
        "preferences.json".into()
    }

    fn default_preference_key() -> String {
        "allowance_list".into()
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            file_name: Self::default_file_name(),
            preference_file: Self::default_preference_file(),
            preference_key: Self::default_preference_key(),
        }
    }
}

/// Loads and saves [`Config`] as JSON under the application base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let path = PathResolver::config_file_in(&base);
        Ok(Self { base, path })
    }

    /// Missing file yields [`Config::default`].
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| LedgerError::Config(err.to_string()))?;
        write_atomic(&self.path, &json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
