//! Recoverable conditions found while projecting a file.
//!
//! Nothing here stops a run. Each diagnostic is logged when it is raised
//! and kept in the run report.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::base::Position;

/// A warning with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Arc<Path>,
    /// 0-indexed
    pub position: Position,
    /// Warning code (e.g., "W0002").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn warning(file: Arc<Path>, position: Position, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            position,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: warning",
            self.file.display(),
            self.position.line + 1,
            self.position.column + 1,
        )?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Warning codes.
pub mod codes {
    /// Embedded script rejected by the minifier.
    pub const SCRIPT_COMPILE_FAILURE: &str = "W0001";
    /// Action declared with no link to it seen so far in its scope.
    pub const DANGLING_ACTION: &str = "W0002";
    /// Multi-word link without an explicit keyword.
    pub const AMBIGUOUS_LINK: &str = "W0003";
}

/// Collects the diagnostics of one file.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    file: Arc<Path>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Arc::from(file.into()),
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn script_failure(&mut self, position: Position, name: &str, reason: &str) {
        self.add(
            Diagnostic::warning(
                self.file.clone(),
                position,
                format!("script `{name}` failed to compile: {reason}"),
            )
            .with_code(codes::SCRIPT_COMPILE_FAILURE),
        );
    }

    pub fn dangling_action(&mut self, position: Position, keyword: &str) {
        self.add(
            Diagnostic::warning(
                self.file.clone(),
                position,
                format!("definition of action [{keyword}] without associated link"),
            )
            .with_code(codes::DANGLING_ACTION),
        );
    }

    pub fn ambiguous_link(&mut self, position: Position, keyword: &str) {
        self.add(
            Diagnostic::warning(
                self.file.clone(),
                position,
                format!(
                    "link without keyword spans more than one word; using [{keyword}]"
                ),
            )
            .with_code(codes::AMBIGUOUS_LINK),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
