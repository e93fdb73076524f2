//! Recursive descent parser for gamebook sources
//!
//! Builds a rowan GreenNode tree from tokens.
//! Errors are recorded with their range and the parser always makes progress,
//! so a malformed file still yields a complete (lossless) CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse gamebook source text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// What the raw script collector is inside of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawState<'a> {
    Code,
    Quote(&'a str),
    LineComment,
    BlockComment,
}

/// Scope kind named by a header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    Module,
    Scene,
    Passage,
    Item,
}

impl HeaderKind {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "Module" => Some(Self::Module),
            "Scene" => Some(Self::Scene),
            "Passage" => Some(Self::Passage),
            "Item" => Some(Self::Item),
            _ => None,
        }
    }
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&'a Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the first token at or after `idx` that is not horizontal whitespace
    fn skip_ws_from(&self, mut idx: usize) -> usize {
        while self
            .tokens
            .get(idx)
            .is_some_and(|t| t.kind == SyntaxKind::WHITESPACE)
        {
            idx += 1;
        }
        idx
    }

    fn kind_at(&self, idx: usize) -> Option<SyntaxKind> {
        self.tokens.get(idx).map(|t| t.kind)
    }

    /// Header kind if the token at `idx` starts a well-formed header line
    fn header_kind_at(&self, idx: usize) -> Option<HeaderKind> {
        if self.kind_at(idx)? != SyntaxKind::HASH {
            return None;
        }
        let word_idx = self.skip_ws_from(idx + 1);
        let word = self.tokens.get(word_idx)?;
        if word.kind != SyntaxKind::WORD {
            return None;
        }
        let kind = HeaderKind::from_word(word.text)?;
        let colon_idx = self.skip_ws_from(word_idx + 1);
        (self.kind_at(colon_idx)? == SyntaxKind::COLON).then_some(kind)
    }

    /// `keyword {` at the token at `idx`
    fn is_action_start_at(&self, idx: usize) -> bool {
        self.kind_at(idx) == Some(SyntaxKind::WORD)
            && self.kind_at(self.skip_ws_from(idx + 1)) == Some(SyntaxKind::L_BRACE)
    }

    /// Count the line breaks in the trivia run starting at the cursor.
    /// Returns the number of breaks and the index of the first token after the run.
    fn scan_breaks(&self) -> (usize, usize) {
        let mut idx = self.pos;
        let mut breaks = 0;
        while let Some(kind) = self.kind_at(idx) {
            match kind {
                SyntaxKind::NEWLINE => breaks += 1,
                SyntaxKind::WHITESPACE => {}
                _ => break,
            }
            idx += 1;
        }
        (breaks, idx)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume the current token, re-tagging it with a contextual kind
    fn bump_as(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.current() {
            self.builder.token(kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.at(SyntaxKind::WHITESPACE) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = match self.current() {
            Some(t) => TextRange::at(t.offset, TextSize::of(t.text)),
            None => self
                .tokens
                .last()
                .map(|t| TextRange::empty(t.offset + TextSize::of(t.text)))
                .unwrap_or_else(|| TextRange::empty(TextSize::new(0))),
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and skip the rest of the current line
    fn error_recover_line(&mut self, message: impl Into<String>) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at(SyntaxKind::NEWLINE) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = Module*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        self.skip_trivia();
        while !self.at_eof() {
            let pos_before = self.pos;
            self.parse_module();
            self.skip_trivia();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_recover_line("Expected a Module, Scene or Item header");
            }
        }
        self.finish_node();
    }

    /// Module = ModuleHeader? (Scene | Item)*
    fn parse_module(&mut self) {
        self.start_node(SyntaxKind::MODULE);
        if self.header_kind_at(self.pos) == Some(HeaderKind::Module) {
            self.parse_header();
        }
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            match self.header_kind_at(self.pos) {
                Some(HeaderKind::Module) => break,
                Some(HeaderKind::Scene) => self.parse_scene(),
                Some(HeaderKind::Item) => self.parse_entry(SyntaxKind::ITEM),
                Some(HeaderKind::Passage) => {
                    self.error("Expected a Scene header before the first Passage");
                    self.start_node(SyntaxKind::ERROR);
                    self.parse_entry(SyntaxKind::PASSAGE);
                    self.finish_node();
                }
                None if self.at(SyntaxKind::HASH) => self.error_recover_line(
                    "Expected 'Module', 'Scene', 'Passage' or 'Item' followed by ':' after '#'",
                ),
                None => self.error_recover_line("Expected a Scene or Item header"),
            }
        }
        self.finish_node();
    }

    /// Scene = SceneHeader ScriptBlock? Passage*
    fn parse_scene(&mut self) {
        self.start_node(SyntaxKind::SCENE);
        self.parse_header();
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_script_block();
        }
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            match self.header_kind_at(self.pos) {
                Some(HeaderKind::Passage) => self.parse_entry(SyntaxKind::PASSAGE),
                Some(_) => break,
                None if self.at(SyntaxKind::HASH) => self.error_recover_line(
                    "Expected 'Module', 'Scene', 'Passage' or 'Item' followed by ':' after '#'",
                ),
                None => self.error_recover_line("Expected a Passage header"),
            }
        }
        self.finish_node();
    }

    /// Passage | Item = Header Body
    /// Body = (Action | Content)*
    fn parse_entry(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.parse_header();
        self.start_node(SyntaxKind::BODY);
        loop {
            self.skip_trivia();
            if self.at_eof() || self.at(SyntaxKind::HASH) {
                break;
            }
            if self.is_action_start_at(self.pos) {
                self.parse_action();
            } else {
                self.parse_content(false);
            }
        }
        self.finish_node();
        self.finish_node();
    }

    /// Header = '#'+ KindName ':' Identifier State? Summary? ScriptBlock?
    fn parse_header(&mut self) {
        self.start_node(SyntaxKind::HEADER);
        self.expect(SyntaxKind::HASH, "Expected '#' to start a header");
        self.skip_ws();
        self.bump_as(SyntaxKind::KIND_NAME);
        self.skip_ws();
        self.expect(SyntaxKind::COLON, "Expected ':' after the header kind");
        self.skip_ws();

        if self.current_kind().is_word_like() && !self.at_eof() {
            self.parse_identifier();
        } else {
            self.error("Expected a name after ':'");
        }
        self.skip_ws();

        if self.at(SyntaxKind::L_PAREN) {
            self.parse_state();
            self.skip_ws();
        }
        if self.at(SyntaxKind::DOUBLE_QUOTE) {
            self.parse_summary();
            self.skip_ws();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_script_block();
            self.skip_ws();
        }
        if !self.at_eof() && !self.at(SyntaxKind::NEWLINE) {
            self.error_recover_line("Expected the end of the header line");
        }
        self.finish_node();
    }

    /// Identifier = Word (' ' Word)*
    fn parse_identifier(&mut self) {
        self.start_node(SyntaxKind::IDENTIFIER);
        loop {
            self.bump();
            let next = self.skip_ws_from(self.pos);
            if self.kind_at(next).is_some_and(SyntaxKind::is_word_like) {
                self.skip_ws();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// State = '(' Word ')'
    fn parse_state(&mut self) {
        self.bump();
        self.skip_ws();
        if self.current_kind().is_word_like() && !self.at_eof() {
            self.start_node(SyntaxKind::STATE);
            self.bump();
            self.finish_node();
        } else {
            self.error("Expected a state name inside '( )'");
        }
        self.skip_ws();
        self.expect(SyntaxKind::R_PAREN, "Expected ')' to close the state");
    }

    /// Summary = '"' String '"'
    fn parse_summary(&mut self) {
        self.start_node(SyntaxKind::SUMMARY);
        self.bump();
        self.start_node(SyntaxKind::STRING);
        let mut escaped = false;
        while !self.at_eof() && !self.at(SyntaxKind::NEWLINE) {
            if self.at(SyntaxKind::DOUBLE_QUOTE) && !escaped {
                break;
            }
            escaped = self.current_text() == "\\" && !escaped;
            self.bump();
        }
        self.finish_node();
        self.expect(SyntaxKind::DOUBLE_QUOTE, "Expected '\"' to close the summary");
        self.finish_node();
    }

    /// ScriptBlock = '{' Script '}'
    fn parse_script_block(&mut self) {
        if !self.expect(SyntaxKind::L_BRACE, "Expected '{' to open a script") {
            return;
        }
        self.start_node(SyntaxKind::SCRIPT);
        self.collect_raw(SyntaxKind::R_BRACE);
        self.finish_node();
        self.expect(SyntaxKind::R_BRACE, "Expected '}' to close the script");
    }

    fn text_at(&self, idx: usize) -> Option<&'a str> {
        self.tokens.get(idx).map(|t| t.text)
    }

    /// Consume raw script tokens up to `stop` at brace depth zero, skipping over
    /// quoted string text and comments so delimiters inside them are not counted.
    ///
    /// A line comment ends at the line break, or at `>>` inside a tag.
    fn collect_raw(&mut self, stop: SyntaxKind) {
        let mut depth = 0usize;
        let mut state = RawState::Code;
        let mut escaped = false;
        while !self.at_eof() {
            let kind = self.current_kind();
            let text = self.current_text();
            match state {
                RawState::Quote(open) => {
                    if text == open && !escaped {
                        state = RawState::Code;
                    }
                    escaped = text == "\\" && !escaped;
                    self.bump();
                    continue;
                }
                RawState::LineComment => {
                    if kind == SyntaxKind::NEWLINE {
                        state = RawState::Code;
                    } else if kind == stop && stop == SyntaxKind::R_TAG {
                        break;
                    }
                    self.bump();
                    continue;
                }
                RawState::BlockComment => {
                    if text == "*" && self.text_at(self.pos + 1) == Some("/") {
                        self.bump();
                        state = RawState::Code;
                    }
                    self.bump();
                    continue;
                }
                RawState::Code => {}
            }
            match kind {
                SyntaxKind::L_BRACE => depth += 1,
                _ if kind == stop && depth == 0 => break,
                SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
                SyntaxKind::DOUBLE_QUOTE => state = RawState::Quote("\""),
                SyntaxKind::PUNCT if text == "'" || text == "`" => state = RawState::Quote(text),
                SyntaxKind::PUNCT if text == "/" => match self.text_at(self.pos + 1) {
                    Some("/") => state = RawState::LineComment,
                    Some("*") => {
                        self.bump();
                        state = RawState::BlockComment;
                    }
                    _ => {}
                },
                _ => {}
            }
            self.bump();
        }
    }

    /// Action = Keyword ScriptBlock
    fn parse_action(&mut self) {
        self.start_node(SyntaxKind::ACTION);
        self.bump_as(SyntaxKind::KEYWORD);
        self.skip_ws();
        self.parse_script_block();
        self.finish_node();
    }

    /// Content = (Word | Punctuation | NewLine | EndParagraph | Link | Tag)+
    ///
    /// Line breaks that end the block stay outside of it. `nested` content
    /// lives inside an if tag and also stops at a closing tag.
    fn parse_content(&mut self, nested: bool) {
        self.start_node(SyntaxKind::CONTENT);
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::WORD | SyntaxKind::NUMBER => self.bump_as(SyntaxKind::WORD),
                SyntaxKind::WHITESPACE => self.bump(),
                SyntaxKind::NEWLINE => {
                    let (breaks, next) = self.scan_breaks();
                    if next >= self.tokens.len()
                        || self.kind_at(next) == Some(SyntaxKind::HASH)
                        || self.is_action_start_at(next)
                    {
                        break;
                    }
                    if breaks == 1 {
                        self.bump();
                    } else {
                        self.start_node(SyntaxKind::END_PARAGRAPH);
                        while self.pos < next {
                            self.bump();
                        }
                        self.finish_node();
                    }
                }
                SyntaxKind::L_LINK => self.parse_link(),
                SyntaxKind::L_TAG => self.parse_tag(),
                SyntaxKind::L_CLOSE_TAG if nested => break,
                SyntaxKind::L_CLOSE_TAG => {
                    self.error("Expected an opening '<<if ...>>' before this closing tag");
                    self.start_node(SyntaxKind::ERROR);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::R_LINK => {
                    self.error("Expected '[[' before ']]'");
                    self.start_node(SyntaxKind::ERROR);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::ERROR => {
                    self.error(format!("Expected text, found {:?}", self.current_text()));
                    self.bump();
                }
                _ => self.bump_as(SyntaxKind::PUNCTUATION),
            }
        }
        self.finish_node();
    }

    /// Link = '[[' Word* ('|' Keyword)? ']]'
    fn parse_link(&mut self) {
        self.start_node(SyntaxKind::LINK);
        self.bump();
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::WORD | SyntaxKind::NUMBER => self.bump_as(SyntaxKind::WORD),
                SyntaxKind::WHITESPACE => self.bump(),
                SyntaxKind::PIPE => {
                    self.bump();
                    self.skip_ws();
                    if self.current_kind().is_word_like() && !self.at_eof() {
                        self.bump_as(SyntaxKind::KEYWORD);
                    } else {
                        self.error("Expected a keyword after '|'");
                    }
                    self.skip_ws();
                    break;
                }
                SyntaxKind::R_LINK
                | SyntaxKind::NEWLINE
                | SyntaxKind::L_LINK
                | SyntaxKind::L_TAG
                | SyntaxKind::L_CLOSE_TAG => break,
                _ => self.bump_as(SyntaxKind::PUNCTUATION),
            }
        }
        self.expect(SyntaxKind::R_LINK, "Expected ']]' to close the link");
        self.finish_node();
    }

    /// Tag = InlineTag | IfTag | ScriptTag
    fn parse_tag(&mut self) {
        let next = self.skip_ws_from(self.pos + 1);
        match self.tokens.get(next).map(|t| (t.kind, t.text)) {
            Some((SyntaxKind::EQ, _)) => self.parse_inline_tag(),
            Some((SyntaxKind::WORD, "if")) => self.parse_if_tag(),
            Some((SyntaxKind::WORD, "script")) => self.parse_script_tag(),
            _ => {
                self.error("Expected '=', 'if' or 'script' after '<<'");
                self.start_node(SyntaxKind::ERROR);
                self.bump();
                self.finish_node();
            }
        }
    }

    /// InlineTag = '<<' '=' Script '>>'
    fn parse_inline_tag(&mut self) {
        self.start_node(SyntaxKind::INLINE_TAG);
        self.bump();
        self.skip_ws();
        self.bump();
        self.skip_ws();
        self.start_node(SyntaxKind::SCRIPT);
        self.collect_raw(SyntaxKind::R_TAG);
        self.finish_node();
        self.expect(SyntaxKind::R_TAG, "Expected '>>' to close the inline tag");
        self.finish_node();
    }

    /// IfTag = '<<' 'if' JsExpr '>>' Content '<</' 'if' '>>'
    fn parse_if_tag(&mut self) {
        self.start_node(SyntaxKind::IF_TAG);

        self.start_node(SyntaxKind::TAG_OPEN);
        self.bump();
        self.skip_ws();
        self.bump_as(SyntaxKind::TAG_NAME);
        self.skip_ws();
        self.start_node(SyntaxKind::JS_EXPR);
        self.collect_raw(SyntaxKind::R_TAG);
        self.finish_node();
        self.expect(SyntaxKind::R_TAG, "Expected '>>' to close the if condition");
        self.finish_node();

        self.parse_content(true);
        self.parse_close_tag("if");

        self.finish_node();
    }

    /// ScriptTag = '<<' 'script' '>>' Script '<</' 'script' '>>'
    fn parse_script_tag(&mut self) {
        self.start_node(SyntaxKind::SCRIPT_TAG);

        self.start_node(SyntaxKind::TAG_OPEN);
        self.bump();
        self.skip_ws();
        self.bump_as(SyntaxKind::TAG_NAME);
        self.skip_ws();
        self.expect(SyntaxKind::R_TAG, "Expected '>>' after 'script'");
        self.finish_node();

        self.start_node(SyntaxKind::SCRIPT);
        self.collect_raw(SyntaxKind::L_CLOSE_TAG);
        self.finish_node();
        self.parse_close_tag("script");

        self.finish_node();
    }

    fn parse_close_tag(&mut self, name: &str) {
        let expected = format!("Expected '<</{name}>>'");
        if !self.at(SyntaxKind::L_CLOSE_TAG) {
            self.error(expected);
            return;
        }
        self.start_node(SyntaxKind::TAG_CLOSE);
        self.bump();
        self.skip_ws();
        if self.at(SyntaxKind::WORD) && self.current_text() == name {
            self.bump_as(SyntaxKind::TAG_NAME);
            self.skip_ws();
            self.expect(SyntaxKind::R_TAG, &expected);
        } else {
            self.error(expected);
        }
        self.finish_node();
    }
}

