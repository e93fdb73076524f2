//! Script minification.
//!
//! Embedded script is never executed or validated by the compiler; it is only
//! minified. [`CompactMinifier`] works on a logos token stream: comments go,
//! whitespace collapses to the single character needed to keep tokens apart,
//! and a line break is kept wherever it may terminate a statement. Unbalanced
//! delimiters and unterminated strings, comments or regex literals are
//! rejected.
//!
//! A `/` where an operand is expected starts a regex literal, which is copied
//! as is. After an identifier, a number, a string or a closing delimiter it
//! is division, so `return /x/` is not supported.

use logos::Logos;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MinifyError {
    #[error("unterminated string literal at byte {0}")]
    UnterminatedString(usize),

    #[error("unterminated block comment at byte {0}")]
    UnterminatedComment(usize),

    #[error("unterminated regex literal at byte {0}")]
    UnterminatedRegex(usize),

    #[error("unbalanced '{found}' at byte {offset}")]
    Unbalanced { found: char, offset: usize },

    #[error("'{0}' is never closed")]
    Unclosed(char),

    #[error("unexpected input {text:?} at byte {offset}")]
    Unexpected { text: String, offset: usize },
}

/// External minifier seam
pub trait Minifier {
    fn minify(&self, source: &str) -> Result<String, MinifyError>;
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum JsToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[token("/*")]
    UnterminatedComment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    #[regex(r"`([^`\\]|\\.)*`")]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    #[regex(r"`([^`\\]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    #[regex(r"[(\[{]")]
    Open,

    #[regex(r"[)\]}]")]
    Close,

    #[regex(r"[^\p{L}\p{N}_$ \t\r\f\n()\[\]{}]", priority = 1)]
    Punct,
}

impl JsToken {
    fn is_word(self) -> bool {
        matches!(self, JsToken::Ident | JsToken::Number)
    }

    /// Tokens after which a line break may end a statement
    fn can_end_statement(self) -> bool {
        matches!(
            self,
            JsToken::Ident | JsToken::Number | JsToken::Str | JsToken::Close
        )
    }

    fn can_start_statement(self) -> bool {
        matches!(
            self,
            JsToken::Ident | JsToken::Number | JsToken::Str | JsToken::Open
        )
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// `+ +`, `- -` and `/ /` change meaning when written without the space
fn would_fuse(last: char, first: char) -> bool {
    last == first && matches!(last, '+' | '-' | '/')
}

/// Byte length of a regex literal's body, closing `/` and flags, given the
/// text right after its opening `/`
fn regex_literal_len(rest: &str) -> Option<usize> {
    let mut escaped = false;
    let mut in_class = false;
    for (index, ch) in rest.char_indices() {
        match ch {
            '\n' => return None,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let end = index + 1;
                let flags = rest[end..]
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(rest.len() - end);
                return Some(end + flags);
            }
            _ => {}
        }
    }
    None
}

/// Whitespace-and-comment stripping minifier
#[derive(Debug, Default, Clone, Copy)]
pub struct CompactMinifier;

impl Minifier for CompactMinifier {
    fn minify(&self, source: &str) -> Result<String, MinifyError> {
        let mut lexer = JsToken::lexer(source);
        let mut out = String::with_capacity(source.len());
        let mut open: Vec<char> = Vec::new();
        let mut prev: Option<(JsToken, char)> = None;
        let mut gap = false;
        let mut gap_newline = false;

        while let Some(token) = lexer.next() {
            let offset = lexer.span().start;
            let mut token = token.map_err(|()| MinifyError::Unexpected {
                text: lexer.slice().to_string(),
                offset,
            })?;
            let expects_operand = !prev.is_some_and(|(prev, _)| prev.can_end_statement());
            if token == JsToken::Punct && lexer.slice() == "/" && expects_operand {
                let len = regex_literal_len(&source[offset + 1..])
                    .ok_or(MinifyError::UnterminatedRegex(offset))?;
                lexer.bump(len);
                token = JsToken::Str;
            }
            let text = lexer.slice();

            match token {
                JsToken::Whitespace => {
                    gap = true;
                    continue;
                }
                JsToken::Newline | JsToken::LineComment => {
                    gap = true;
                    gap_newline = true;
                    continue;
                }
                JsToken::BlockComment => {
                    gap = true;
                    gap_newline |= text.contains('\n');
                    continue;
                }
                JsToken::UnterminatedComment => {
                    return Err(MinifyError::UnterminatedComment(offset));
                }
                JsToken::UnterminatedStr => return Err(MinifyError::UnterminatedString(offset)),
                JsToken::Open => open.extend(text.chars()),
                JsToken::Close => {
                    let found = text.chars().next().unwrap_or(')');
                    match open.pop() {
                        Some(opener) if closing_for(opener) == found => {}
                        _ => return Err(MinifyError::Unbalanced { found, offset }),
                    }
                }
                _ => {}
            }

            if let Some((prev, last)) = prev {
                if gap_newline && prev.can_end_statement() && token.can_start_statement() {
                    out.push('\n');
                } else if gap
                    && ((prev.is_word() && token.is_word())
                        || would_fuse(last, text.chars().next().unwrap_or(' ')))
                {
                    out.push(' ');
                }
            }
            out.push_str(text);
            prev = Some((token, text.chars().last().unwrap_or(' ')));
            gap = false;
            gap_newline = false;
        }

        match open.pop() {
            Some(opener) => Err(MinifyError::Unclosed(opener)),
            None => Ok(out),
        }
    }
}
