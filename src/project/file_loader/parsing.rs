use std::path::Path;

use super::LoadError;

pub fn get_extension(path: &Path) -> Result<&str, LoadError> {
    path.extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| LoadError::NoExtension(path.to_path_buf()))
}

/// Check that `path` carries the source extension
pub fn validate_extension<'a>(path: &'a Path, expected: &str) -> Result<&'a str, LoadError> {
    let ext = get_extension(path)?;
    if ext == expected {
        Ok(ext)
    } else {
        Err(LoadError::UnsupportedExtension {
            extension: ext.to_string(),
        })
    }
}

/// Load file contents
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
