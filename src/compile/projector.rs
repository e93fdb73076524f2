//! Projection of a normalized tree into the relational store.
//!
//! The walk is pre-order: a node's row exists before any of its children is
//! written, so every child row can name its parent. Scopes go through the
//! [`DeduplicationResolver`] first; a scope seen earlier in the run keeps its
//! identity, its header is not reapplied, and only its other children are
//! added under it.
//!
//! A validation pass runs over the whole tree before the first row is
//! written, so a rejected file leaves nothing behind.

use tracing::{debug, trace};

use super::error::ProjectError;
use crate::base::constants::{DEFAULT_MODULE_NAME, NODE_SCRIPT_PREFIX};
use crate::base::{LineIndex, Position};
use crate::script::ScriptCompiler;
use crate::semantic::{
    ActionLinker, DeduplicationResolver, DiagnosticCollector, ScopeContext, WordIndex,
    canonical_text,
};
use crate::store::{GraphStore, NewNode, RowId, ScopeHeader};
use crate::syntax::{NodeId, NodeKind, NormalizedTree, ScopeKind};

type Result<T> = std::result::Result<T, ProjectError>;

/// The indexes that live for a whole run and are shared by every file
#[derive(Debug, Default)]
pub struct RunIndexes {
    pub scopes: DeduplicationResolver,
    pub actions: ActionLinker,
    pub words: WordIndex,
}

/// One file's view of the run while it is being projected
pub struct RelationalProjector<'a> {
    store: &'a GraphStore,
    indexes: &'a mut RunIndexes,
    scripts: &'a ScriptCompiler,
    tree: &'a NormalizedTree,
    lines: &'a LineIndex,
    diagnostics: &'a mut DiagnosticCollector,
}

impl<'a> RelationalProjector<'a> {
    pub fn new(
        store: &'a GraphStore,
        indexes: &'a mut RunIndexes,
        scripts: &'a ScriptCompiler,
        tree: &'a NormalizedTree,
        lines: &'a LineIndex,
        diagnostics: &'a mut DiagnosticCollector,
    ) -> Self {
        Self {
            store,
            indexes,
            scripts,
            tree,
            lines,
            diagnostics,
        }
    }

    /// Validate, then write the whole tree. Returns the root row id.
    pub fn project(mut self) -> Result<RowId> {
        validate(self.tree, self.lines)?;

        let tree = self.tree;
        let context = ScopeContext::new();
        for &child in tree.children(tree.root()) {
            if tree.kind(child) == NodeKind::Module {
                self.project_scope(child, ScopeKind::Module, context)?;
            }
        }
        Ok(self.store.root())
    }

    fn position(&self, node: NodeId) -> Position {
        self.lines.position(self.tree.node(node).range.start())
    }

    fn project_scope(&mut self, node: NodeId, kind: ScopeKind, context: ScopeContext) -> Result<RowId> {
        let tree = self.tree;
        let header = tree.child_of_kind(node, NodeKind::Header);
        let name = match header.and_then(|h| scope_name(tree, h)) {
            Some(name) => name,
            None if kind == ScopeKind::Module => DEFAULT_MODULE_NAME.to_string(),
            None => {
                return Err(ProjectError::MissingHeader {
                    kind,
                    position: self.position(node),
                });
            }
        };

        let parent_scope = context.parent_for(kind);
        if kind != ScopeKind::Module && parent_scope.is_none() {
            return Err(ProjectError::OutsideScope {
                kind: kind.node_kind(),
                expected: enclosing_name(kind),
                position: self.position(node),
            });
        }

        let (id, created) = match self.indexes.scopes.resolve(kind, &name, parent_scope) {
            Some(id) => {
                debug!(?kind, name = %name, id, "reusing scope");
                (id, false)
            }
            None => {
                let parent = parent_scope.unwrap_or(self.store.root());
                let id = self
                    .store
                    .insert_node(NewNode::new(parent, kind.node_kind()))?;
                self.store.insert_scope(kind, id, parent_scope, &name)?;
                self.indexes.scopes.register(kind, &name, parent_scope, id);
                (id, true)
            }
        };

        let inner = context.enter(kind, id);
        for &child in tree.children(node) {
            match tree.kind(child) {
                NodeKind::Header if created => self.project_header(child, kind, id)?,
                NodeKind::Header => trace!(id, "header of a reused scope dropped"),
                NodeKind::Scene => {
                    self.project_scope(child, ScopeKind::Scene, inner)?;
                }
                NodeKind::Passage => {
                    self.project_scope(child, ScopeKind::Passage, inner)?;
                }
                NodeKind::Item => {
                    self.project_scope(child, ScopeKind::Item, inner)?;
                }
                NodeKind::Content => {
                    self.project_content(child, id, None, inner)?;
                }
                NodeKind::Action => {
                    self.project_action(child, id, inner)?;
                }
                NodeKind::Script => {
                    self.project_node_script(child, id)?;
                }
                other => trace!(?other, "not projected under a scope"),
            }
        }
        Ok(id)
    }

    fn project_header(&mut self, header: NodeId, kind: ScopeKind, scope: RowId) -> Result<()> {
        let tree = self.tree;
        let header_id = self
            .store
            .insert_node(NewNode::new(scope, NodeKind::Header))?;
        let mut fields = ScopeHeader::default();

        for &child in tree.children(header) {
            let child_kind = tree.kind(child);
            let raw = tree.text(child).unwrap_or("");
            let content = match child_kind {
                NodeKind::Identifier => Some(collapse_whitespace(raw)),
                NodeKind::State => {
                    let state = raw.trim().to_string();
                    fields.state = Some(state.clone());
                    Some(state)
                }
                NodeKind::Summary => {
                    let summary = unquote(raw).to_string();
                    fields.summary = Some(summary.clone());
                    Some(summary)
                }
                NodeKind::Script => {
                    let name = format!("{}{}", kind.prefix(), scope);
                    let compiled = self.compile_script(child, raw, &name);
                    fields.script = compiled.clone();
                    compiled
                }
                _ => None,
            };
            self.store.insert_node(
                NewNode::new(header_id, child_kind).content(content.as_deref()),
            )?;
        }

        self.store.update_scope_header(kind, scope, &fields)?;
        Ok(())
    }

    /// Prose block. Every retained child gets its 1-based rank as sort index.
    fn project_content(
        &mut self,
        content: NodeId,
        parent: RowId,
        sort_index: Option<i64>,
        context: ScopeContext,
    ) -> Result<RowId> {
        let tree = self.tree;
        let content_id = self.store.insert_node(
            NewNode::new(parent, NodeKind::Content).sort_index(sort_index),
        )?;

        for (rank, &child) in tree.children(content).iter().enumerate() {
            let sort = Some(rank as i64 + 1);
            match tree.kind(child) {
                kind if kind.is_word_token() => {
                    self.project_word(child, content_id, sort)?;
                }
                NodeKind::Link => {
                    self.project_link(child, content_id, sort, context)?;
                }
                NodeKind::IfTag => {
                    self.project_if_tag(child, content_id, sort, context)?;
                }
                kind @ (NodeKind::InlineTag | NodeKind::ScriptTag) => {
                    let tag = self
                        .store
                        .insert_node(NewNode::new(content_id, kind).sort_index(sort))?;
                    if let Some(script) = tree.child_of_kind(child, NodeKind::Script) {
                        self.project_node_script(script, tag)?;
                    }
                }
                other => trace!(?other, "not projected in content"),
            }
        }
        Ok(content_id)
    }

    /// Word-like token, stored by reference into the word index
    fn project_word(&mut self, node: NodeId, parent: RowId, sort_index: Option<i64>) -> Result<()> {
        let kind = self.tree.kind(node);
        let Some(text) = canonical_text(kind, self.tree.text(node)) else {
            return Ok(());
        };
        let word = self.indexes.words.intern(self.store, text)?;
        self.store.insert_node(
            NewNode::new(parent, kind)
                .sort_index(sort_index)
                .ref_id(word),
        )?;
        Ok(())
    }

    fn project_link(
        &mut self,
        link: NodeId,
        parent: RowId,
        sort_index: Option<i64>,
        context: ScopeContext,
    ) -> Result<RowId> {
        let tree = self.tree;
        let position = self.position(link);
        let Some(scope) = context.action_scope() else {
            return Err(ProjectError::OutsideScope {
                kind: NodeKind::Link,
                expected: "Passage or Item",
                position,
            });
        };

        let words: Vec<NodeId> = tree
            .children(link)
            .iter()
            .copied()
            .filter(|c| tree.kind(*c) == NodeKind::Word)
            .collect();
        let explicit = tree
            .child_of_kind(link, NodeKind::Keyword)
            .and_then(|k| tree.text(k))
            .map(str::trim)
            .filter(|k| !k.is_empty());
        let keyword = match (explicit, words.first()) {
            (Some(keyword), _) => keyword,
            (None, Some(first)) => {
                let first = tree.text(*first).unwrap_or("");
                if words.len() > 1 {
                    self.diagnostics.ambiguous_link(position, first);
                }
                first
            }
            (None, None) => return Err(ProjectError::MalformedLink { position }),
        };

        let link_id = self.store.insert_node(
            NewNode::new(parent, NodeKind::Link)
                .content(Some(keyword))
                .sort_index(sort_index),
        )?;
        for (rank, &word) in words.iter().enumerate() {
            self.project_word(word, link_id, Some(rank as i64 + 1))?;
        }

        let action = self
            .indexes
            .actions
            .link_reference(self.store, keyword, scope)?;
        self.store.set_node_ref(link_id, action)?;
        Ok(link_id)
    }

    fn project_if_tag(
        &mut self,
        tag: NodeId,
        parent: RowId,
        sort_index: Option<i64>,
        context: ScopeContext,
    ) -> Result<RowId> {
        let tree = self.tree;
        let tag_id = self.store.insert_node(
            NewNode::new(parent, NodeKind::IfTag).sort_index(sort_index),
        )?;
        for (rank, &child) in tree.children(tag).iter().enumerate() {
            let sort = Some(rank as i64 + 1);
            match tree.kind(child) {
                NodeKind::JsExpr => {
                    self.project_expression(child, tag_id, sort)?;
                }
                NodeKind::Content => {
                    self.project_content(child, tag_id, sort, context)?;
                }
                other => trace!(?other, "not projected in if tag"),
            }
        }
        Ok(tag_id)
    }

    fn project_expression(&mut self, node: NodeId, parent: RowId, sort_index: Option<i64>) -> Result<RowId> {
        let id = self.store.insert_node(
            NewNode::new(parent, NodeKind::JsExpr).sort_index(sort_index),
        )?;
        let name = format!("{NODE_SCRIPT_PREFIX}{id}");
        let raw = self.tree.text(node).unwrap_or("");
        let compiled = match self.scripts.compile_expression(raw, &name) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                self.diagnostics
                    .script_failure(self.position(node), &name, &err.source.to_string());
                None
            }
        };
        let expression = self.store.insert_expression(compiled.as_deref())?;
        self.store.set_node_ref(id, expression)?;
        Ok(id)
    }

    fn project_action(&mut self, action: NodeId, parent: RowId, context: ScopeContext) -> Result<RowId> {
        let tree = self.tree;
        let position = self.position(action);
        let Some(scope) = context.action_scope() else {
            return Err(ProjectError::OutsideScope {
                kind: NodeKind::Action,
                expected: "Passage or Item",
                position,
            });
        };
        let keyword = tree
            .child_of_kind(action, NodeKind::Keyword)
            .and_then(|k| tree.text(k))
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ProjectError::MissingKeyword { position })?;

        let name = scope.qualify(keyword);
        let compiled = match tree.child_of_kind(action, NodeKind::Script) {
            Some(script) => {
                let raw = tree.text(script).unwrap_or("");
                self.compile_script(script, raw, &name)
            }
            None => self.compile_script(action, "", &name),
        };

        let declared = self.indexes.actions.declare_action(
            self.store,
            keyword,
            compiled.as_deref(),
            scope,
        )?;
        if declared.dangling {
            self.diagnostics.dangling_action(position, keyword);
        }

        Ok(self.store.insert_node(
            NewNode::new(parent, NodeKind::Action)
                .content(Some(keyword))
                .ref_id(declared.id),
        )?)
    }

    /// Free-standing script (scene script, inline tag, script tag), compiled
    /// under the synthetic name `o<nodeId>`
    fn project_node_script(&mut self, script: NodeId, parent: RowId) -> Result<RowId> {
        let id = self
            .store
            .insert_node(NewNode::new(parent, NodeKind::Script))?;
        let name = format!("{NODE_SCRIPT_PREFIX}{id}");
        let raw = self.tree.text(script).unwrap_or("");
        let compiled = self.compile_script(script, raw, &name);
        self.store.set_node_content(id, compiled.as_deref())?;
        Ok(id)
    }

    /// Compiled text, or `None` after recording a warning
    fn compile_script(&mut self, node: NodeId, raw: &str, name: &str) -> Option<String> {
        match self.scripts.compile(raw, name) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                self.diagnostics
                    .script_failure(self.position(node), name, &err.source.to_string());
                None
            }
        }
    }
}

/// Reject what cannot be projected before anything is written.
pub fn validate(tree: &NormalizedTree, lines: &LineIndex) -> Result<()> {
    let position = |id: NodeId| lines.position(tree.node(id).range.start());

    for (id, node) in tree.iter() {
        let parent_kind = node.parent.map(|p| tree.kind(p));
        match node.kind {
            NodeKind::Link => {
                let has_text = node.children.iter().any(|c| {
                    matches!(tree.kind(*c), NodeKind::Word | NodeKind::Keyword)
                        && tree.text(*c).is_some_and(|t| !t.trim().is_empty())
                });
                if !has_text {
                    return Err(ProjectError::MalformedLink { position: position(id) });
                }
            }
            NodeKind::Action => {
                if tree.child_of_kind(id, NodeKind::Keyword).is_none() {
                    return Err(ProjectError::MissingKeyword { position: position(id) });
                }
            }
            kind @ (NodeKind::Scene | NodeKind::Passage | NodeKind::Item) => {
                let Ok(scope) = ScopeKind::try_from(kind) else {
                    continue;
                };
                let expected_parent = match scope {
                    ScopeKind::Passage => NodeKind::Scene,
                    _ => NodeKind::Module,
                };
                if parent_kind != Some(expected_parent) {
                    return Err(ProjectError::OutsideScope {
                        kind,
                        expected: enclosing_name(scope),
                        position: position(id),
                    });
                }
                let named = tree
                    .child_of_kind(id, NodeKind::Header)
                    .and_then(|h| scope_name(tree, h))
                    .is_some();
                if !named {
                    return Err(ProjectError::MissingHeader {
                        kind: scope,
                        position: position(id),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn enclosing_name(kind: ScopeKind) -> &'static str {
    match kind {
        ScopeKind::Module => "Root",
        ScopeKind::Scene | ScopeKind::Item => "Module",
        ScopeKind::Passage => "Scene",
    }
}

/// Declared name of a scope, from its header's identifier
fn scope_name(tree: &NormalizedTree, header: NodeId) -> Option<String> {
    let identifier = tree.child_of_kind(header, NodeKind::Identifier)?;
    let name = collapse_whitespace(tree.text(identifier)?);
    (!name.is_empty()).then_some(name)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summary text without its surrounding quotes
fn unquote(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}
