//! Semantic view of the raw CST: the closed node-kind set and the
//! normalizer that reduces a parse tree to it.

pub mod node_kind;
pub mod normalized;

pub use node_kind::{ChildRule, NodeKind, ScopeKind};
pub use normalized::{NodeId, NormalizedNode, NormalizedTree, normalize};
