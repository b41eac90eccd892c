use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{LedgerError, Result};

const TMP_SUFFIX: &str = "tmp";

/// Creates `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| {
        LedgerError::Persistence(format!("unable to create {}: {}", path.display(), err))
    })
}

/// Sibling staging path, e.g. `ledger.txt` -> `ledger.txt.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces the content of `path` by staging to a temporary file and renaming
/// it into place. A failure leaves the previous content untouched.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    let tmp = tmp_path(path);
    let staged = stage(&tmp, data).and_then(|_| fs::rename(&tmp, path));
    if let Err(err) = staged {
        let _ = fs::remove_file(&tmp);
        return Err(LedgerError::Persistence(format!(
            "unable to write {}: {}",
            path.display(),
            err
        )));
    }
    Ok(())
}

fn stage(tmp: &Path, data: &str) -> std::io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()
}

/// Reads `path` as UTF-8, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(data),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(LedgerError::Persistence(format!(
            "unable to read {}: {}",
            path.display(),
            err
        ))),
    }
}
