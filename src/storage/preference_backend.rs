use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{
    errors::Result,
    utils::persistence::{ensure_dir, read_or_empty, write_atomic},
};

use super::StorageBackend;

type Preferences = Map<String, Value>;

/// Key-value preference file; the ledger blob lives under a single string key
/// and every other key, whatever its type, is left as found.
#[derive(Debug, Clone)]
pub struct PreferenceStorage {
    path: PathBuf,
    key: String,
}

impl PreferenceStorage {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }
        Ok(Self {
            path,
            key: key.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_all(&self) -> Result<Preferences> {
        let data = read_or_empty(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Preferences::new());
        }
        Ok(serde_json::from_str(&data)?)
    }
}

impl StorageBackend for PreferenceStorage {
    fn load(&self) -> Result<String> {
        let prefs = self.read_all()?;
        Ok(prefs
            .get(&self.key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    fn save(&self, blob: &str) -> Result<()> {
        let mut prefs = self.read_all()?;
        prefs.insert(self.key.clone(), Value::String(blob.to_string()));
        let json = serde_json::to_string_pretty(&prefs)?;
        write_atomic(&self.path, &json)
    }

    fn describe(&self) -> String {
        format!("preferences {}#{}", self.path.display(), self.key)
    }
}
