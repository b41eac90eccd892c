use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

pub use crate::utils::persistence::ensure_dir;

const DEFAULT_DIR_NAME: &str = ".allowance_core";
const HOME_ENV: &str = "ALLOWANCE_CORE_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";

/// Resolves where configuration and ledger data live on disk.
pub struct PathResolver;

impl PathResolver {
    /// `ALLOWANCE_CORE_HOME` if set, otherwise `~/.allowance_core`.
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

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }
}
