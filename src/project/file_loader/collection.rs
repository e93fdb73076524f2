use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{LoadError, validate_extension};

/// Every file under `root` with the given extension, in a stable
/// (file-name sorted, depth-first) order.
pub fn collect_file_paths(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && validate_extension(entry.path(), extension).is_ok() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
