//! Error types for compiling a run.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::Position;
use crate::parser::ParseFailure;
use crate::project::LoadError;
use crate::store::StoreError;
use crate::syntax::{NodeKind, ScopeKind};

/// Errors that reject the file being projected.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// `[[ ]]` with neither a keyword nor any word.
    #[error("{}:{}: link has neither a keyword nor any word", .position.line + 1, .position.column + 1)]
    MalformedLink { position: Position },

    /// Action declaration without a keyword.
    #[error("{}:{}: action declared without a keyword", .position.line + 1, .position.column + 1)]
    MissingKeyword { position: Position },

    /// Scene, Passage or Item without a name.
    #[error("{}:{}: {kind:?} declared without a name", .position.line + 1, .position.column + 1)]
    MissingHeader { kind: ScopeKind, position: Position },

    /// A node whose enclosing scope is not open.
    #[error("{}:{}: {kind:?} outside of an enclosing {expected}", .position.line + 1, .position.column + 1)]
    OutsideScope {
        kind: NodeKind,
        expected: &'static str,
        position: Position,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by a [`CompileSession`](super::CompileSession).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Grammar(#[from] ParseFailure),

    #[error("{}:{source}", .path.display())]
    Project {
        path: PathBuf,
        #[source]
        source: ProjectError,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl CompileError {
    /// Attach the file to a projection error. Storage failures stay storage
    /// failures so that they remain fatal.
    pub fn project(path: impl Into<PathBuf>, error: ProjectError) -> Self {
        match error {
            ProjectError::Store(store) => CompileError::Store(store),
            source => CompileError::Project {
                path: path.into(),
                source,
            },
        }
    }

    /// Whether the whole run must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompileError::Store(_))
    }

    /// Text shown for a rejected file
    pub fn render(&self) -> String {
        match self {
            CompileError::Grammar(failure) => failure.render(),
            other => other.to_string(),
        }
    }
}
