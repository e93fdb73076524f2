//! Normalized ("cutdown") syntax tree.
//!
//! The raw CST keeps every token the grammar produced. The normalizer reduces
//! it to the fixed set of [`NodeKind`]s: for each node only the descendants in
//! its retained set survive, hoisted to direct children in source order, and
//! everything in between is flattened away. Terminals keep their source text
//! and lose their children.
//!
//! The result is an arena addressed by [`NodeId`]; ids are assigned in
//! pre-order, so a parent's id is always smaller than its children's.

use rowan::NodeOrToken;
use smol_str::SmolStr;
use text_size::TextRange;

use super::node_kind::{ChildRule, NodeKind};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};

/// Index of a node in a [`NormalizedTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Source text, terminals only
    pub text: Option<SmolStr>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct NormalizedTree {
    nodes: Vec<NormalizedNode>,
}

impl NormalizedTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NormalizedNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    /// First direct child of the given kind
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.kind(*child) == kind)
    }

    /// All nodes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NormalizedNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Compact s-expression rendering, handy in tests and trace logs
    pub fn dump(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut out = format!("({:?}", node.kind);
        if let Some(text) = &node.text {
            out.push_str(&format!(" {:?}", text.as_str()));
        }
        for child in &node.children {
            out.push(' ');
            out.push_str(&self.dump(*child));
        }
        out.push(')');
        out
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NormalizedNode {
            kind,
            parent,
            children: Vec::new(),
            text: None,
            range,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }
}

/// Normalize a raw syntax tree.
///
/// Returns `None` when the root itself is grammar scaffolding with no
/// semantic kind.
pub fn normalize(root: &SyntaxNode) -> Option<NormalizedTree> {
    let kind = NodeKind::from_syntax(root.kind())?;
    let mut tree = NormalizedTree { nodes: Vec::new() };
    build(&mut tree, &NodeOrToken::Node(root.clone()), kind, None);
    Some(tree)
}

fn build(
    tree: &mut NormalizedTree,
    element: &SyntaxElement,
    kind: NodeKind,
    parent: Option<NodeId>,
) -> NodeId {
    let id = tree.alloc(kind, parent, element.text_range());
    match kind.child_rule() {
        ChildRule::Terminal => {
            let text = match element {
                NodeOrToken::Node(node) => SmolStr::new(node.text().to_string()),
                NodeOrToken::Token(token) => SmolStr::new(token.text()),
            };
            tree.nodes[id.index()].text = Some(text);
        }
        ChildRule::ScriptOnly => {
            // Everything but the script is fixed markup
            if let NodeOrToken::Node(node) = element {
                if let Some(script) = node.children().find(|c| c.kind() == SyntaxKind::SCRIPT) {
                    build(tree, &NodeOrToken::Node(script), NodeKind::Script, Some(id));
                }
            }
        }
        ChildRule::Retain(retained) => {
            if let NodeOrToken::Node(node) = element {
                collect(tree, node, retained, id);
            }
        }
    }
    id
}

fn collect(tree: &mut NormalizedTree, node: &SyntaxNode, retained: &[NodeKind], parent: NodeId) {
    for child in node.children_with_tokens() {
        match NodeKind::from_syntax(child.kind()) {
            Some(kind) if retained.contains(&kind) => {
                build(tree, &child, kind, Some(parent));
            }
            _ => {
                if let NodeOrToken::Node(inner) = &child {
                    collect(tree, inner, retained, parent);
                }
            }
        }
    }
}
