//! Logos-based lexer for gamebook sources
//!
//! Fast tokenization using the logos crate. The lexer is lossless: every byte
//! of the input ends up in exactly one token.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    // =========================================================================
    // PROSE
    // =========================================================================
    #[regex(r"[\p{L}\p{N}_]+(['’][\p{L}\p{N}_]+)*")]
    Word,

    #[regex(r"[0-9]+(\.[0-9]+)?", priority = 5)]
    Number,

    // =========================================================================
    // MARKUP (must win over single-character punctuation)
    // =========================================================================
    #[regex(r"#+")]
    Hash,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token("=")]
    Eq,

    #[token("\"")]
    DoubleQuote,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[[")]
    LLink,

    #[token("]]")]
    RLink,

    #[token("<<")]
    LTag,

    #[token("<</")]
    LCloseTag,

    #[token(">>")]
    RTag,

    #[regex(r"[^\p{L}\p{N}_ \t\r\n]", priority = 1)]
    Punct,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Newline => SyntaxKind::NEWLINE,
            LogosToken::Word => SyntaxKind::WORD,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::Hash => SyntaxKind::HASH,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::DoubleQuote => SyntaxKind::DOUBLE_QUOTE,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LLink => SyntaxKind::L_LINK,
            LogosToken::RLink => SyntaxKind::R_LINK,
            LogosToken::LTag => SyntaxKind::L_TAG,
            LogosToken::LCloseTag => SyntaxKind::L_CLOSE_TAG,
            LogosToken::RTag => SyntaxKind::R_TAG,
            LogosToken::Punct => SyntaxKind::PUNCT,
        }
    }
}
