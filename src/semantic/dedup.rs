//! Identity of named scopes across the files of one run.
//!
//! A scope is identified by its kind, its name and the scope it is declared
//! in. The second declaration of the same triple, in the same or another
//! file, resolves to the identity of the first.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::store::RowId;
use crate::syntax::ScopeKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScopeKey {
    kind: ScopeKind,
    name: SmolStr,
    parent: Option<RowId>,
}

#[derive(Debug, Default)]
pub struct DeduplicationResolver {
    seen: FxHashMap<ScopeKey, RowId>,
}

impl DeduplicationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of an earlier declaration of `name`, if any
    pub fn resolve(&self, kind: ScopeKind, name: &str, parent: Option<RowId>) -> Option<RowId> {
        self.seen
            .get(&ScopeKey {
                kind,
                name: SmolStr::new(name),
                parent,
            })
            .copied()
    }

    /// Record a new scope. The first registration of a key wins.
    pub fn register(&mut self, kind: ScopeKind, name: &str, parent: Option<RowId>, id: RowId) {
        self.seen
            .entry(ScopeKey {
                kind,
                name: SmolStr::new(name),
                parent,
            })
            .or_insert(id);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
