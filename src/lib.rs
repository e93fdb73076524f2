//! # gamebook-base
//!
//! Compiler core for gamebook interactive fiction: parses `.gbook` sources,
//! reduces the syntax tree to a fixed set of semantic node kinds and projects
//! it into a relational store for a runtime player.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! compile   → RelationalProjector, CompileSession, options, errors
//!   ↓
//! project   → Source discovery and loading
//! semantic  → Scope dedup, action linking, word index, diagnostics
//!   ↓
//! store     → SQLite-backed graph store
//! script    → Embedded script compiler and minifier
//!   ↓
//! syntax    → NodeKind, normalized tree, TreeNormalizer
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan CST
//!   ↓
//! base      → Positions, line index, constants
//! ```

/// Foundation types: Position, LineIndex, constants
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, rowan CST
pub mod parser;

/// Syntax: semantic node kinds and the normalized tree
pub mod syntax;

/// Embedded script compilation
pub mod script;

/// Relational store for the projected graph
pub mod store;

/// Run-wide indexes and diagnostics
pub mod semantic;

/// Source discovery
pub mod project;

/// Compilation runs
pub mod compile;

pub use base::{LineIndex, Position, TextRange, TextSize};
pub use compile::{CompileError, CompileOptions, CompileReport, CompileSession};
