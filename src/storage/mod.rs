//! Persistence backends for the serialized ledger blob.
//!
//! A backend stores one opaque string. The ledger always hands it the
//! complete serialization; backends never append or patch.

pub mod file_backend;
pub mod memory_backend;
pub mod preference_backend;

use std::{path::Path, sync::Arc};

use crate::{
    config::{BackendKind, Config},
    core::utils::PathResolver,
    errors::Result,
};

pub use file_backend::FileStorage;
pub use memory_backend::MemoryStorage;
pub use preference_backend::PreferenceStorage;

/// Abstraction over stores capable of holding the ledger blob.
pub trait StorageBackend: Send + Sync {
    /// Full persisted blob, or `""` when nothing was ever saved.
    fn load(&self) -> Result<String>;

    /// Overwrites the previous blob. A later `load` sees either the old or the
    /// new content, never a mix.
    fn save(&self, blob: &str) -> Result<()>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

/// Shares one backend between a store and an observer, e.g. a test that
/// inspects what was written.
impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn load(&self) -> Result<String> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<()> {
        (**self).save(blob)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Builds the backend selected by `config`, rooted under `base`'s data dir.
pub fn open_backend(config: &Config, base: &Path) -> Result<Box<dyn StorageBackend>> {
    let data_dir = PathResolver::data_dir_in(base);
    let settings = &config.storage;
    let backend: Box<dyn StorageBackend> = match settings.backend {
        BackendKind::File => Box::new(FileStorage::new(data_dir.join(&settings.file_name))?),
        BackendKind::Preferences => Box::new(PreferenceStorage::new(
            data_dir.join(&settings.preference_file),
            settings.preference_key.clone(),
        )?),
    };
    tracing::debug!(backend = %backend.describe(), "opened ledger storage");
    Ok(backend)
}
