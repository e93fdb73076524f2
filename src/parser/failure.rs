//! Grammar failure reports.
//!
//! A file the grammar rejects is reported with the expected-construct hint,
//! the offending source line and a column pointer:
//!
//! ```text
//! Expected ']]' to close the link:
//! Go to the [[door.
//! ~~~~~~~~~~~~~~~~^
//! ```

use std::fmt;
use std::path::PathBuf;

use super::parser::SyntaxError;
use crate::base::{LineIndex, Position};

/// First grammar error of a rejected file, resolved to a line and column
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}:{}:{}: {message}", .path.display(), .position.line + 1, .position.column + 1)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
    /// 0-indexed position of the offending token
    pub position: Position,
    /// The offending source line, without its terminator
    pub source_line: String,
    /// How many errors the parser recorded in total
    pub error_count: usize,
}

impl ParseFailure {
    /// Build a failure from the parser's errors; `None` when there are none.
    pub fn from_errors(
        path: impl Into<PathBuf>,
        errors: &[SyntaxError],
        index: &LineIndex,
    ) -> Option<Self> {
        let first = errors.first()?;
        let position = index.position(first.range.start());
        Some(Self {
            path: path.into(),
            message: first.message.replace('\n', "$NEWLINE"),
            position,
            source_line: index.line_text(position.line).unwrap_or("").to_string(),
            error_count: errors.len(),
        })
    }

    /// Three-line report: hint, offending line, pointer
    pub fn render(&self) -> String {
        format!("{}", Rendered(self))
    }
}

struct Rendered<'a>(&'a ParseFailure);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failure = self.0;
        writeln!(f, "{}:", failure.message)?;
        writeln!(f, "{}", failure.source_line)?;
        write!(f, "{}^", "~".repeat(failure.position.column))
    }
}
