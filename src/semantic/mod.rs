//! Run-wide indexes consulted while projecting.
//!
//! Each index keeps its lookup table in memory and writes through to the
//! [`GraphStore`](crate::store::GraphStore), so the store never has to be
//! queried back during a run.

mod actions;
mod dedup;
pub mod diagnostics;
mod scope;
mod words;

pub use actions::{ActionEntry, ActionLinker, Declaration};
pub use dedup::DeduplicationResolver;
pub use diagnostics::{Diagnostic, DiagnosticCollector};
pub use scope::{ActionScope, ScopeContext};
pub use words::{WordIndex, canonical_text};
