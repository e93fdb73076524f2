//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the raw syntax tree
//! of a gamebook source file.

/// All syntax kinds (tokens and nodes) of the gamebook grammar
///
/// Tokens are leaf nodes (words, punctuation, markup delimiters).
/// Nodes are composite (modules, passages, links, tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,            // \n (a line break inside Content is kept as a NewLine)

    // =========================================================================
    // LEXED TOKENS
    // =========================================================================
    WORD,               // lantern, don't
    NUMBER,             // 42
    PUNCT,              // any other single character
    HASH,               // # (one or more)
    COLON,              // :
    PIPE,               // |
    EQ,                 // =
    DOUBLE_QUOTE,       // "
    L_BRACE,            // {
    R_BRACE,            // }
    L_PAREN,            // (
    R_PAREN,            // )
    L_LINK,             // [[
    R_LINK,             // ]]
    L_TAG,              // <<
    L_CLOSE_TAG,        // <</
    R_TAG,              // >>

    // =========================================================================
    // CONTEXTUAL TOKENS (re-tagged by the parser)
    // =========================================================================
    KEYWORD,            // action keyword, link keyword
    PUNCTUATION,        // punctuation inside prose
    KIND_NAME,          // Module / Scene / Passage / Item in a header
    TAG_NAME,           // if / script inside << >>

    // =========================================================================
    // COMPOSITE NODES
    // =========================================================================
    SOURCE_FILE,
    MODULE,
    SCENE,
    PASSAGE,
    ITEM,
    HEADER,
    IDENTIFIER,
    STATE,
    SUMMARY,
    STRING,
    SCRIPT,
    BODY,
    CONTENT,
    ACTION,
    END_PARAGRAPH,
    LINK,
    INLINE_TAG,
    IF_TAG,
    TAG_OPEN,
    TAG_CLOSE,
    SCRIPT_TAG,
    JS_EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or line break)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Check if this token can start a word of prose
    pub fn is_word_like(self) -> bool {
        matches!(self, Self::WORD | Self::NUMBER)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GamebookLanguage {}

impl rowan::Language for GamebookLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GamebookLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GamebookLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GamebookLanguage>;
