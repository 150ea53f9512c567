//! Filesystem operations
//!
//! Handles file and directory operations.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use sha2::{Digest, Sha256};

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove a directory tree and recreate it empty
pub fn reset_dir(path: &Path) -> Result<(), FilesystemError> {
    remove_dir_all(path)?;
    create_dir_all(path)
}

/// Whether two paths name the same existing file
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Absolute form of a path that may not exist yet
///
/// The longest existing prefix is canonicalized and the missing components
/// are appended to it.
pub fn resolve_path(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(base) = fs::canonicalize(current) {
            return missing.iter().rev().fold(base, |acc, c| acc.join(c));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Whether `inner` is `outer` itself or lies somewhere below it
pub fn is_within(outer: &Path, inner: &Path) -> bool {
    resolve_path(inner).starts_with(resolve_path(outer))
}

/// Copy a file, preserving permissions and access/modification times
///
/// Copying a file onto itself is a no-op.
pub fn copy_preserving(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    if is_same_file(from, to) {
        return Ok(());
    }

    let copy_err = |e: std::io::Error| FilesystemError::CopyFile {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    };

    let metadata = fs::metadata(from).map_err(copy_err)?;
    fs::copy(from, to).map_err(copy_err)?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime).map_err(|e| FilesystemError::Metadata {
        path: to.to_path_buf(),
        error: e.to_string(),
    })
}

/// SHA-256 of a file's contents as lowercase hex
pub fn file_sha256(path: &Path) -> Result<String, FilesystemError> {
    let read_err = |e: std::io::Error| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = fs::File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
