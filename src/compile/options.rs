//! Run configuration.

use std::env;
use std::path::PathBuf;

use crate::base::constants::{DEFAULT_OUTPUT, GAMEBOOK_EXT};

pub const OUTPUT_ENV: &str = "GAMEBOOK_OUTPUT";
pub const EXTENSION_ENV: &str = "GAMEBOOK_EXTENSION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Store file, recreated at the start of every run
    pub output: PathBuf,
    /// Source file extension, without the dot
    pub extension: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            extension: GAMEBOOK_EXT.to_string(),
        }
    }
}

impl CompileOptions {
    /// Defaults overridden by `GAMEBOOK_OUTPUT` and `GAMEBOOK_EXTENSION`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let output = lookup(OUTPUT_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output);
        let extension = lookup(EXTENSION_ENV)
            .and_then(|v| normalize_extension(&v))
            .unwrap_or(defaults.extension);
        Self { output, extension }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        if let Some(extension) = normalize_extension(extension) {
            self.extension = extension;
        }
        self
    }
}

/// `.gbook`, ` gbook ` and `gbook` are the same extension
fn normalize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim().trim_start_matches('.');
    (!ext.is_empty()).then(|| ext.to_string())
}
