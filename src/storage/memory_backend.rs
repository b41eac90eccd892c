use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use crate::errors::{LedgerError, Result};

use super::StorageBackend;

/// In-process backend for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<String>,
    fail_next_save: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(blob.into()),
            ..Self::default()
        }
    }

    /// Makes the next `save` fail without touching the stored blob.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, String>> {
        self.blob
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<String> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Persistence("simulated save failure".into()));
        }
        *self.lock()? = blob.to_string();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
