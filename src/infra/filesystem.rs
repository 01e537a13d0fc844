//! Filesystem operations
//!
//! Handles file and directory lookups.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Resolve a directory to its absolute, symlink-free form
pub fn resolve_dir(path: &Path) -> Result<PathBuf, FilesystemError> {
    let resolved = path.canonicalize().map_err(|e| FilesystemError::ResolveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    if !resolved.is_dir() {
        return Err(FilesystemError::ResolveDir {
            path: path.to_path_buf(),
            error: "not a directory".to_string(),
        });
    }
    Ok(resolved)
}
