//! Session and store helpers for pipeline tests.

use std::path::Path;

use gamebook::compile::{CompileError, CompileOptions, CompileSession};
use gamebook::semantic::Diagnostic;
use gamebook::store::{GraphStore, NodeRow, RowId, ScopeRow};
use gamebook::syntax::{NodeKind, ScopeKind};

/// In-memory session with default options.
pub fn session() -> CompileSession {
    CompileSession::in_memory(CompileOptions::default()).expect("in-memory store")
}

/// Compile `(file name, source)` units in order, panicking on rejection.
pub fn compile_all(units: &[(&str, &str)]) -> (CompileSession, Vec<Diagnostic>) {
    let mut session = session();
    let mut diagnostics = Vec::new();
    for (name, source) in units {
        match session.compile_source(Path::new(name), source) {
            Ok(found) => diagnostics.extend(found),
            Err(err) => panic!("{name} rejected:\n{}", err.render()),
        }
    }
    (session, diagnostics)
}

/// Compile a single unit and return its result.
pub fn compile_one(source: &str) -> (CompileSession, Result<Vec<Diagnostic>, CompileError>) {
    let mut session = session();
    let result = session.compile_source(Path::new("test.gbook"), source);
    (session, result)
}

pub fn warning_codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect()
}

pub fn scope(store: &GraphStore, kind: ScopeKind, name: &str) -> ScopeRow {
    store
        .scopes(kind)
        .expect("scopes")
        .into_iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no {kind:?} named {name}"))
}

pub fn children_of_kind(store: &GraphStore, parent: RowId, kind: NodeKind) -> Vec<NodeRow> {
    store
        .children(parent)
        .expect("children")
        .into_iter()
        .filter(|n| n.kind == kind)
        .collect()
}

/// Text of the word a word-token node refers to
pub fn word_text(store: &GraphStore, node: &NodeRow) -> String {
    let id = node.ref_id.expect("word tokens reference the word index");
    store
        .word_by_id(id)
        .expect("word lookup")
        .expect("referenced word exists")
        .text
}

/// Every non-root node names a parent created before it.
pub fn assert_parents_precede_children(store: &GraphStore) {
    let nodes = store.nodes().expect("nodes");
    for node in &nodes {
        match node.parent_id {
            None => assert_eq!(node.kind, NodeKind::Root, "only the root has no parent"),
            Some(parent) => {
                assert!(
                    parent < node.id,
                    "node {} ({:?}) has parent {} created after it",
                    node.id,
                    node.kind,
                    parent
                );
                assert!(
                    nodes.iter().any(|n| n.id == parent),
                    "node {} has a dangling parent {}",
                    node.id,
                    parent
                );
            }
        }
    }
}
