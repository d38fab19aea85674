//! Exclusive run lock over the clone directory

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::constants::SyncPath;
use crate::{Error, Result};

/// Advisory lock held for the duration of a sync run.
///
/// Working clones live in a shared cache directory; the lock guarantees a
/// single run owns every clone in it. Released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock in `dir`, creating the directory if needed.
    ///
    /// Fails with [`Error::LockHeld`] without blocking when another run
    /// holds it.
    pub fn acquire(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let path = dir.join(SyncPath::LockFile.as_str());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        file.try_lock_exclusive()
            .map_err(|_| Error::LockHeld { path: path.clone() })?;

        tracing::debug!(path = %path.display(), "Acquired run lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release run lock");
        }
    }
}
