//! Foundation types for the gamebook toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`LineIndex`] - byte offset to line/column conversion
//! - [`Position`] - line/column positions for diagnostics
//! - Domain constants (file extension, sentinel words, synthetic name prefixes)
//!
//! This module has NO dependencies on other gamebook modules.

pub mod constants;
mod position;

pub use position::{LineIndex, Position};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
