//! Atomic file I/O used by every tree operation

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Name of a directory entry, or `None` (with a warning) when it is not UTF-8.
///
/// Tree paths are UTF-8 strings; such entries are left alone everywhere.
pub(crate) fn entry_name(entry: &fs::DirEntry) -> Option<String> {
    match entry.file_name().into_string() {
        Ok(name) => Some(name),
        Err(raw) => {
            tracing::warn!(
                path = %entry.path().display(),
                name = ?raw,
                "Skipping entry whose name is not valid UTF-8"
            );
            None
        }
    }
}

/// Write content atomically to a file.
///
/// Writes to a sibling temp file under an advisory lock, syncs it, then
/// renames it over the target, so a killed run never leaves a half-written
/// document behind.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Copy `src` to `dst` unless `dst` already holds identical bytes.
///
/// Returns `true` when the destination was written.
pub fn copy_if_changed(src: &Path, dst: &Path) -> Result<bool> {
    let content = fs::read(src).map_err(|e| Error::io(src, e))?;

    if dst.is_file() {
        let existing = fs::read(dst).map_err(|e| Error::io(dst, e))?;
        if existing == content {
            return Ok(false);
        }
    } else if dst.is_dir() {
        fs::remove_dir_all(dst).map_err(|e| Error::io(dst, e))?;
    }

    write_atomic(dst, &content)?;
    Ok(true)
}

/// Remove a file or a directory tree. Missing paths are not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    result.map_err(|e| Error::io(path, e))
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
