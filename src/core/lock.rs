//! Staging directory lock
//!
//! Reconfiguration wipes the staging directory, so two runs against the same
//! staging tree would destroy each other's output. [`StagingLock`] holds an
//! exclusive advisory lock on a sibling file (`<staging>.lock`) for the whole
//! run. The lock file lives outside the staging tree so the wipe cannot
//! remove it while it is held.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::defaults::LOCK_EXTENSION;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Exclusive lock over one staging directory
///
/// Released when dropped.
#[derive(Debug)]
pub struct StagingLock {
    file: File,
    path: PathBuf,
}

impl StagingLock {
    /// Path of the lock file guarding `staging_dir`
    pub fn lock_path(staging_dir: &Path) -> PathBuf {
        let mut name = staging_dir
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| "staging".into());
        name.push(".");
        name.push(LOCK_EXTENSION);
        staging_dir.with_file_name(name)
    }

    /// Acquire the lock, blocking while another run holds it
    pub fn acquire(staging_dir: &Path) -> Result<Self, FilesystemError> {
        let lock = Self::open(staging_dir)?;

        match lock.file.try_lock_exclusive() {
            Ok(()) => {}
            Err(_) => {
                tracing::info!(
                    "Waiting for another build to release {}",
                    lock.path.display()
                );
                lock.file.lock_exclusive().map_err(|e| FilesystemError::Lock {
                    path: lock.path.clone(),
                    error: e.to_string(),
                })?;
            }
        }

        tracing::debug!("Acquired staging lock {}", lock.path.display());
        Ok(lock)
    }

    /// Acquire the lock only if it is free
    ///
    /// Returns `Ok(None)` when another holder has it.
    pub fn try_acquire(staging_dir: &Path) -> Result<Option<Self>, FilesystemError> {
        let lock = Self::open(staging_dir)?;
        match lock.file.try_lock_exclusive() {
            Ok(()) => Ok(Some(lock)),
            Err(_) => Ok(None),
        }
    }

    /// Path of the held lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(staging_dir: &Path) -> Result<Self, FilesystemError> {
        let path = Self::lock_path(staging_dir);
        if let Some(parent) = path.parent() {
            filesystem::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| FilesystemError::Lock {
                path: path.clone(),
                error: e.to_string(),
            })?;

        Ok(Self { file, path })
    }
}

impl Drop for StagingLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_is_sibling() {
        assert_eq!(
            StagingLock::lock_path(Path::new("/proj/meson_build")),
            PathBuf::from("/proj/meson_build.lock")
        );
    }

    #[test]
    fn test_second_holder_is_refused() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("meson_build");

        let first = StagingLock::acquire(&staging).unwrap();
        assert!(StagingLock::try_acquire(&staging).unwrap().is_none());

        drop(first);
        assert!(StagingLock::try_acquire(&staging).unwrap().is_some());
    }

    #[test]
    fn test_lock_survives_staging_wipe() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("meson_build");
        std::fs::create_dir_all(&staging).unwrap();

        let lock = StagingLock::acquire(&staging).unwrap();
        filesystem::reset_dir(&staging).unwrap();

        assert!(lock.path().exists());
    }
}
