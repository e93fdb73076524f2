mod collection;
mod parsing;

use std::path::PathBuf;

pub use collection::collect_file_paths;
pub use parsing::{get_extension, load_file, validate_extension};

/// Failure to discover or read source files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No file extension: {}", .0.display())]
    NoExtension(PathBuf),

    #[error("Unsupported file extension: {extension}")]
    UnsupportedExtension { extension: String },
}
