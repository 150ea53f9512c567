//! Clean logic
//!
//! Removes the staging and build directories of a project. The staging lock
//! file is left alone since another process may be holding it.

use std::path::{Path, PathBuf};

use crate::core::lock::StagingLock;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Directories that were removed
    pub removed: Vec<PathBuf>,
    /// Directories that didn't exist (skipped)
    pub skipped: Vec<PathBuf>,
}

/// Remove the staging and build directories
///
/// Holds the staging lock while removing so a concurrent build is not
/// pulled out from under itself.
pub fn clean_project(staging_dir: &Path, build_dir: &Path) -> Result<CleanResult, FilesystemError> {
    let _lock = StagingLock::acquire(staging_dir)?;
    let mut result = CleanResult::default();

    for dir in [staging_dir, build_dir] {
        if dir.exists() {
            filesystem::remove_dir_all(dir)?;
            tracing::info!("Removed {}", dir.display());
            result.removed.push(dir.to_path_buf());
        } else {
            result.skipped.push(dir.to_path_buf());
        }
    }

    Ok(result)
}

/// Check if any of the directories exist
pub fn has_build_artifacts(staging_dir: &Path, build_dir: &Path) -> bool {
    staging_dir.exists() || build_dir.exists()
}
