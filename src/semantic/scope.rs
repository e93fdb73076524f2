//! The chain of scopes open at a point of the projection.
//!
//! The context is a value passed down the recursive walk. Entering a scope
//! returns a new context; nothing is mutated behind the caller's back.

use crate::store::RowId;
use crate::syntax::ScopeKind;

/// The scope that owns actions and links: exactly one Passage or Item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionScope {
    Passage(RowId),
    Item(RowId),
}

impl ActionScope {
    pub fn id(self) -> RowId {
        match self {
            ActionScope::Passage(id) | ActionScope::Item(id) => id,
        }
    }

    pub fn kind(self) -> ScopeKind {
        match self {
            ActionScope::Passage(_) => ScopeKind::Passage,
            ActionScope::Item(_) => ScopeKind::Item,
        }
    }

    /// `p<id>_<keyword>` or `i<id>_<keyword>`
    pub fn qualify(self, keyword: &str) -> String {
        format!("{}{}_{}", self.kind().prefix(), self.id(), keyword)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeContext {
    module: Option<RowId>,
    scene: Option<RowId>,
    innermost: Option<ActionScope>,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self) -> Option<RowId> {
        self.module
    }

    pub fn scene(&self) -> Option<RowId> {
        self.scene
    }

    pub fn action_scope(&self) -> Option<ActionScope> {
        self.innermost
    }

    /// The scope a new declaration of `kind` is attached to.
    ///
    /// `None` for a Module, or when the enclosing scope is not open (a
    /// Passage outside any Scene).
    pub fn parent_for(&self, kind: ScopeKind) -> Option<RowId> {
        match kind {
            ScopeKind::Module => None,
            ScopeKind::Scene | ScopeKind::Item => self.module,
            ScopeKind::Passage => self.scene,
        }
    }

    /// Context seen by the children of the scope `id`.
    pub fn enter(self, kind: ScopeKind, id: RowId) -> Self {
        match kind {
            ScopeKind::Module => Self {
                module: Some(id),
                scene: None,
                innermost: None,
            },
            ScopeKind::Scene => Self {
                scene: Some(id),
                innermost: None,
                ..self
            },
            ScopeKind::Passage => Self {
                innermost: Some(ActionScope::Passage(id)),
                ..self
            },
            ScopeKind::Item => Self {
                scene: None,
                innermost: Some(ActionScope::Item(id)),
                ..self
            },
        }
    }
}
