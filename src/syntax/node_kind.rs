//! The closed set of semantic node kinds.
//!
//! Every normalized node carries one of these kinds; the discriminant is the
//! integer code persisted in `Nodes.kind`.

use crate::base::constants::{ITEM_PREFIX, MODULE_PREFIX, PASSAGE_PREFIX, SCENE_PREFIX};
use crate::parser::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Root = 1,
    Module = 2,
    Scene = 3,
    Passage = 4,
    Item = 5,
    Header = 6,
    State = 7,
    Summary = 8,
    Content = 9,
    Action = 10,
    NewLine = 11,
    EndParagraph = 12,
    Link = 13,
    Identifier = 14,
    String = 15,
    Keyword = 16,
    Word = 17,
    Number = 18,
    Punctuation = 19,
    Script = 20,
    JsExpr = 21,
    InlineTag = 22,
    IfTag = 23,
    ScriptTag = 24,
}

/// What the normalizer does with the children of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRule {
    /// Keep descendants of these kinds as direct children, flattening the rest
    Retain(&'static [NodeKind]),
    /// Keep only the source text, discard every child
    Terminal,
    /// Keep only the nested raw script (inline tags)
    ScriptOnly,
}

impl NodeKind {
    pub const ALL: [NodeKind; 24] = [
        NodeKind::Root,
        NodeKind::Module,
        NodeKind::Scene,
        NodeKind::Passage,
        NodeKind::Item,
        NodeKind::Header,
        NodeKind::State,
        NodeKind::Summary,
        NodeKind::Content,
        NodeKind::Action,
        NodeKind::NewLine,
        NodeKind::EndParagraph,
        NodeKind::Link,
        NodeKind::Identifier,
        NodeKind::String,
        NodeKind::Keyword,
        NodeKind::Word,
        NodeKind::Number,
        NodeKind::Punctuation,
        NodeKind::Script,
        NodeKind::JsExpr,
        NodeKind::InlineTag,
        NodeKind::IfTag,
        NodeKind::ScriptTag,
    ];

    /// Integer code persisted in the store
    pub fn code(self) -> i64 {
        self as u8 as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Semantic kind of a raw syntax kind; `None` for grammar scaffolding.
    pub fn from_syntax(kind: SyntaxKind) -> Option<Self> {
        let kind = match kind {
            SyntaxKind::SOURCE_FILE => Self::Root,
            SyntaxKind::MODULE => Self::Module,
            SyntaxKind::SCENE => Self::Scene,
            SyntaxKind::PASSAGE => Self::Passage,
            SyntaxKind::ITEM => Self::Item,
            SyntaxKind::HEADER => Self::Header,
            SyntaxKind::STATE => Self::State,
            SyntaxKind::SUMMARY => Self::Summary,
            SyntaxKind::CONTENT => Self::Content,
            SyntaxKind::ACTION => Self::Action,
            SyntaxKind::NEWLINE => Self::NewLine,
            SyntaxKind::END_PARAGRAPH => Self::EndParagraph,
            SyntaxKind::LINK => Self::Link,
            SyntaxKind::IDENTIFIER => Self::Identifier,
            SyntaxKind::STRING => Self::String,
            SyntaxKind::KEYWORD => Self::Keyword,
            SyntaxKind::WORD => Self::Word,
            SyntaxKind::NUMBER => Self::Number,
            SyntaxKind::PUNCTUATION => Self::Punctuation,
            SyntaxKind::SCRIPT => Self::Script,
            SyntaxKind::JS_EXPR => Self::JsExpr,
            SyntaxKind::INLINE_TAG => Self::InlineTag,
            SyntaxKind::IF_TAG => Self::IfTag,
            SyntaxKind::SCRIPT_TAG => Self::ScriptTag,
            _ => return None,
        };
        Some(kind)
    }

    pub fn child_rule(self) -> ChildRule {
        use NodeKind::*;
        match self {
            Root => ChildRule::Retain(&[Module]),
            Module => ChildRule::Retain(&[Header, Scene, Item]),
            Header => ChildRule::Retain(&[Identifier, State, Summary, Script]),
            Scene => ChildRule::Retain(&[Header, Passage, Script]),
            Passage | Item => ChildRule::Retain(&[Header, Content, Action]),
            Content => ChildRule::Retain(&[
                Word,
                Punctuation,
                EndParagraph,
                NewLine,
                Link,
                InlineTag,
                IfTag,
                ScriptTag,
            ]),
            Action => ChildRule::Retain(&[Keyword, Script]),
            Link => ChildRule::Retain(&[Word, Keyword]),
            IfTag => ChildRule::Retain(&[JsExpr, Content]),
            ScriptTag => ChildRule::Retain(&[Script]),
            InlineTag => ChildRule::ScriptOnly,
            Word | Punctuation | Identifier | Keyword | Number | String | State | NewLine
            | EndParagraph | Script | JsExpr | Summary => ChildRule::Terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.child_rule() == ChildRule::Terminal
    }

    /// Kinds that may appear as direct children of `self` after normalization
    pub fn retains(self, child: NodeKind) -> bool {
        match self.child_rule() {
            ChildRule::Retain(kinds) => kinds.contains(&child),
            ChildRule::ScriptOnly => child == NodeKind::Script,
            ChildRule::Terminal => false,
        }
    }

    /// Named, deduplicated declarations
    pub fn is_scope(self) -> bool {
        ScopeKind::try_from(self).is_ok()
    }

    /// Tokens stored by reference into the word index
    pub fn is_word_token(self) -> bool {
        matches!(
            self,
            NodeKind::Word | NodeKind::Punctuation | NodeKind::NewLine | NodeKind::EndParagraph
        )
    }
}

/// The four named declarations that open a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeKind {
    Module,
    Scene,
    Passage,
    Item,
}

impl ScopeKind {
    pub fn node_kind(self) -> NodeKind {
        match self {
            ScopeKind::Module => NodeKind::Module,
            ScopeKind::Scene => NodeKind::Scene,
            ScopeKind::Passage => NodeKind::Passage,
            ScopeKind::Item => NodeKind::Item,
        }
    }

    /// Prefix of synthetic script names and qualified action names
    pub fn prefix(self) -> &'static str {
        match self {
            ScopeKind::Module => MODULE_PREFIX,
            ScopeKind::Scene => SCENE_PREFIX,
            ScopeKind::Passage => PASSAGE_PREFIX,
            ScopeKind::Item => ITEM_PREFIX,
        }
    }
}

impl TryFrom<NodeKind> for ScopeKind {
    type Error = NodeKind;

    fn try_from(kind: NodeKind) -> Result<Self, Self::Error> {
        match kind {
            NodeKind::Module => Ok(ScopeKind::Module),
            NodeKind::Scene => Ok(ScopeKind::Scene),
            NodeKind::Passage => Ok(ScopeKind::Passage),
            NodeKind::Item => Ok(ScopeKind::Item),
            other => Err(other),
        }
    }
}
