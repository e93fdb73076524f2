//! One compilation run: every source file projected, in order, into a
//! single fresh store.
//!
//! ```text
//! file text → parse → ParseFailure?      (reject file)
//!           → normalize → validate       (reject file, nothing written)
//!           → RelationalProjector        (rows; storage failure aborts run)
//! ```

mod error;
mod options;
mod projector;

pub use error::{CompileError, ProjectError};
pub use options::CompileOptions;
pub use projector::{RelationalProjector, RunIndexes, validate};

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::base::LineIndex;
use crate::parser::{ParseFailure, parse};
use crate::project::{collect_file_paths, load_file};
use crate::script::ScriptCompiler;
use crate::semantic::{Diagnostic, DiagnosticCollector};
use crate::store::GraphStore;
use crate::syntax::normalize;

/// A file the run skipped, with the text shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub compiled: Vec<PathBuf>,
    pub rejected: Vec<RejectedFile>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.diagnostics.is_empty()
    }
}

#[derive(Debug)]
pub struct CompileSession {
    store: GraphStore,
    indexes: RunIndexes,
    scripts: ScriptCompiler,
    options: CompileOptions,
}

impl CompileSession {
    /// Start a run writing to `options.output`; an existing store there is
    /// discarded.
    pub fn create(options: CompileOptions) -> Result<Self, CompileError> {
        let store = GraphStore::create(&options.output)?;
        info!(output = %options.output.display(), "created store");
        Ok(Self::with_store(store, options))
    }

    /// Start a run against an in-memory store
    pub fn in_memory(options: CompileOptions) -> Result<Self, CompileError> {
        Ok(Self::with_store(GraphStore::in_memory()?, options))
    }

    fn with_store(store: GraphStore, options: CompileOptions) -> Self {
        Self {
            store,
            indexes: RunIndexes::default(),
            scripts: ScriptCompiler::default(),
            options,
        }
    }

    pub fn with_script_compiler(mut self, scripts: ScriptCompiler) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn indexes(&self) -> &RunIndexes {
        &self.indexes
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one unit of source text. `path` is only used in reports.
    ///
    /// Returns the unit's warnings. Any error rejects the unit; only
    /// [`CompileError::is_fatal`] errors should stop the run.
    pub fn compile_source(&mut self, path: &Path, text: &str) -> Result<Vec<Diagnostic>, CompileError> {
        let lines = LineIndex::new(text);
        let parse = parse(text);
        if let Some(failure) = ParseFailure::from_errors(path, &parse.errors, &lines) {
            return Err(failure.into());
        }

        let Some(tree) = normalize(&parse.syntax()) else {
            debug!(path = %path.display(), "nothing to project");
            return Ok(Vec::new());
        };

        let mut diagnostics = DiagnosticCollector::new(path);
        RelationalProjector::new(
            &self.store,
            &mut self.indexes,
            &self.scripts,
            &tree,
            &lines,
            &mut diagnostics,
        )
        .project()
        .map_err(|err| CompileError::project(path, err))?;

        Ok(diagnostics.into_diagnostics())
    }

    pub fn compile_file(&mut self, path: &Path) -> Result<Vec<Diagnostic>, CompileError> {
        let text = load_file(path)?;
        self.compile_source(path, &text)
    }

    /// Compile every source file under `root`, one after the other.
    ///
    /// Rejected files are recorded and skipped; a storage failure ends the
    /// run with an error.
    pub fn compile_directory(&mut self, root: &Path) -> Result<CompileReport, CompileError> {
        let paths = collect_file_paths(root, &self.options.extension)?;
        let mut report = CompileReport::default();

        for path in paths {
            info!("Processing file {}", path.display());
            match self.compile_file(&path) {
                Ok(diagnostics) => {
                    report.compiled.push(path);
                    report.diagnostics.extend(diagnostics);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "file rejected");
                    report.rejected.push(RejectedFile {
                        path,
                        message: err.render(),
                    });
                }
            }
        }

        for name in self.indexes.actions.unresolved() {
            debug!(action = name, "link without an action declaration");
        }
        info!(
            compiled = report.compiled.len(),
            rejected = report.rejected.len(),
            warnings = report.diagnostics.len(),
            "run finished"
        );
        Ok(report)
    }
}
