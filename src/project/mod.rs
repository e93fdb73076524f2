//! Source discovery: which files a run compiles and how they are read.

pub mod file_loader;

pub use file_loader::{LoadError, collect_file_paths, load_file, validate_extension};
