use std::path::{Path, PathBuf};

use crate::{
    errors::Result,
    utils::persistence::{ensure_dir, read_or_empty, write_atomic},
};

use super::StorageBackend;

/// Plain UTF-8 text file holding the whole ledger.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates the parent directory; the file itself appears on first save.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn load(&self) -> Result<String> {
        read_or_empty(&self.path)
    }

    fn save(&self, blob: &str) -> Result<()> {
        write_atomic(&self.path, blob)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
