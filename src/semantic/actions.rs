//! Pairs link sites with action declarations.
//!
//! Links and actions meet on the qualified name `<prefix><scopeId>_<keyword>`.
//! Whichever comes first creates the `Actions` row; a link seen before its
//! declaration leaves a stub with no script that the declaration fills in.

use indexmap::IndexMap;
use tracing::debug;

use super::scope::ActionScope;
use crate::store::{GraphStore, RowId, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEntry {
    pub id: RowId,
    /// A link to this action has been projected
    pub linked: bool,
    /// The action body has been declared
    pub declared: bool,
}

/// Outcome of [`ActionLinker::declare_action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub id: RowId,
    /// No link to the action was seen before the declaration
    pub dangling: bool,
}

#[derive(Debug, Default)]
pub struct ActionLinker {
    entries: IndexMap<String, ActionEntry>,
}

impl ActionLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action identity for a link to `keyword`, creating a stub on first sight.
    pub fn link_reference(
        &mut self,
        store: &GraphStore,
        keyword: &str,
        scope: ActionScope,
    ) -> StoreResult<RowId> {
        let name = scope.qualify(keyword);
        if let Some(entry) = self.entries.get_mut(&name) {
            entry.linked = true;
            return Ok(entry.id);
        }
        let id = store.insert_action(&name, None)?;
        debug!(action = %name, id, "stub action");
        self.entries.insert(
            name,
            ActionEntry {
                id,
                linked: true,
                declared: false,
            },
        );
        Ok(id)
    }

    /// Upsert the declaration of `keyword`.
    ///
    /// `script` overwrites the stored script when present; `None` (a script
    /// that failed to compile) keeps whatever the row held.
    pub fn declare_action(
        &mut self,
        store: &GraphStore,
        keyword: &str,
        script: Option<&str>,
        scope: ActionScope,
    ) -> StoreResult<Declaration> {
        let name = scope.qualify(keyword);
        if let Some(entry) = self.entries.get_mut(&name) {
            if script.is_some() {
                store.set_action_script(entry.id, script)?;
            }
            entry.declared = true;
            return Ok(Declaration {
                id: entry.id,
                dangling: false,
            });
        }
        let id = store.insert_action(&name, script)?;
        debug!(action = %name, id, "action");
        self.entries.insert(
            name,
            ActionEntry {
                id,
                linked: false,
                declared: true,
            },
        );
        Ok(Declaration { id, dangling: true })
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ActionEntry> {
        self.entries.get(qualified_name)
    }

    /// Linked actions whose declaration was never seen, in creation order
    pub fn unresolved(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.declared)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
