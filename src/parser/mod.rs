//! Rowan-based parser for gamebook sources
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! The CST is the raw syntax tree handed to the normalizer. It keeps every
//! byte of the source, including the markup scaffolding the normalizer
//! later throws away.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! syntax::normalize → NormalizedTree
//! ```

mod failure;
#[allow(clippy::module_inception)]
mod parser;

mod lexer;
mod syntax_kind;

pub use failure::ParseFailure;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{GamebookLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
