#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use allowance_core::{
    config::Config,
    storage::{FileStorage, MemoryStorage},
    LedgerSession,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Session over an in-memory backend the test can still inspect.
pub fn memory_session() -> (LedgerSession, Arc<MemoryStorage>) {
    memory_session_with("")
}

pub fn memory_session_with(blob: &str) -> (LedgerSession, Arc<MemoryStorage>) {
    let backend = Arc::new(MemoryStorage::with_blob(blob));
    let session = LedgerSession::new(Box::new(backend.clone()), &Config::default())
        .expect("open memory session");
    (session, backend)
}

/// Session over a text file in a fresh temp directory.
pub fn file_session() -> (LedgerSession, PathBuf) {
    let path = temp_base().join("allowance.txt");
    let session = reopen_file(&path);
    (session, path)
}

pub fn reopen_file(path: &std::path::Path) -> LedgerSession {
    let storage = FileStorage::new(path).expect("file storage");
    LedgerSession::new(Box::new(storage), &Config::default()).expect("open file session")
}
