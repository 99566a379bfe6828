//! The lexer.
//!
//! Byte-based scanning with line/column/offset tracking. The lexer is
//! dialect-customizable at two points: a multi-character symbol table
//! checked before the built-in operators (longest match first), and a
//! dynamic keyword table checked between the built-in keywords and the
//! process-wide registry. Keywords registered by *any* dialect are still
//! recognized lexically under every other dialect; whether the active
//! dialect accepts the construct is the parser's call, which is what makes
//! cross-dialect "not supported" diagnostics possible.
//!
//! Comments are not tokens: they accumulate in a side list with their
//! spans, retrievable after lexing for the formatter's decoration pass.

use crate::dialect::Dialect;
use crate::parser::Diagnostic;

use super::position::{Comment, CommentKind, Position, Span};
use super::token::{builtin_keyword, lookup_keyword, Token, TokenType};

/// Everything one lexing pass produces.
#[derive(Debug)]
pub struct LexOutput {
    /// All tokens, ending with EOF. Never empty.
    pub tokens: Vec<Token>,
    /// Comments in source order.
    pub comments: Vec<Comment>,
    /// Lexical diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// A dialect-aware lexer over a source string.
pub struct Lexer<'s, 'd> {
    src: &'s [u8],
    text: &'s str,
    pos: usize,
    line: u32,
    column: u32,
    dialect: &'d Dialect,
    comments: Vec<Comment>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s, 'd> Lexer<'s, 'd> {
    /// Creates a lexer over `src` under `dialect`.
    #[must_use]
    pub fn new(src: &'s str, dialect: &'d Dialect) -> Self {
        Self {
            src: src.as_bytes(),
            text: src,
            pos: 0,
            line: 1,
            column: 1,
            dialect,
            comments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Lexes the whole input, returning tokens (EOF included), comments,
    /// and diagnostics.
    #[must_use]
    pub fn tokenize(mut self) -> LexOutput {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok.is_eof();
            tokens.push(tok);
            if done {
                break;
            }
        }
        LexOutput {
            tokens,
            comments: self.comments,
            diagnostics: self.diagnostics,
        }
    }

    /// Returns the next token, skipping whitespace and recording comments.
    /// At end of input this returns EOF, repeatedly.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.position();

        let Some(b) = self.peek_byte() else {
            return Token::new(TokenType::EOF, String::new(), start, start);
        };

        // Template-macro literal.
        if b == b'{' && self.peek_byte_at(1) == Some(b'{') {
            return self.scan_macro(start);
        }

        // Dialect symbols win over built-in operators; the table is
        // sorted longest first.
        for (sym, ty) in self.dialect.symbols() {
            if self.rest().starts_with(sym.as_str()) {
                for _ in 0..sym.len() {
                    self.bump();
                }
                return self.token(*ty, sym.clone(), start);
            }
        }

        if b == b'\'' {
            return self.scan_string(start);
        }
        if b == self.dialect.config().quoting.open as u8 || b == b'"' {
            return self.scan_quoted_ident(start);
        }
        let dot_digit = b == b'.' && self.peek_byte_at(1).is_some_and(|n| n.is_ascii_digit());
        if b.is_ascii_digit() || dot_digit {
            return self.scan_number(start);
        }
        if is_ident_start(b) {
            return self.scan_word(start);
        }
        if b == b'$' {
            if self.peek_byte_at(1).is_some_and(|n| n.is_ascii_digit()) {
                return self.scan_param(start);
            }
            self.bump();
            return self.illegal(start, "unexpected character `$`");
        }

        self.scan_operator(start)
    }

    /// Returns comments collected so far.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns lexical diagnostics collected so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    fn rest(&self) -> &'s str {
        &self.text[self.pos..]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_byte_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.pos + n).copied()
    }

    /// Consumes one byte, advancing the line/column counters.
    fn bump(&mut self) {
        if let Some(&b) = self.src.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn token(&self, ty: TokenType, text: String, start: Position) -> Token {
        Token::new(ty, text, start, self.position())
    }

    fn slice_token(&self, ty: TokenType, start: Position) -> Token {
        let text = String::from(&self.text[start.offset..self.pos]);
        self.token(ty, text, start)
    }

    fn illegal(&mut self, start: Position, message: &str) -> Token {
        let tok = self.slice_token(TokenType::ILLEGAL, start);
        self.diagnostics
            .push(Diagnostic::lexical(message, tok.span()));
        tok
    }

    /// Skips whitespace and comments, recording each comment with its
    /// span. Comment text includes the delimiters.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => self.bump(),
                Some(b'-') if self.peek_byte_at(1) == Some(b'-') => {
                    let start = self.position();
                    while self.peek_byte().is_some_and(|b| b != b'\n') {
                        self.bump();
                    }
                    self.comments.push(Comment::new(
                        CommentKind::Line,
                        String::from(&self.text[start.offset..self.pos]),
                        Span::new(start, self.position()),
                    ));
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'*') => {
                    let start = self.position();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(b) = self.peek_byte() {
                        if b == b'*' && self.peek_byte_at(1) == Some(b'/') {
                            self.bump();
                            self.bump();
                            closed = true;
                            break;
                        }
                        self.bump();
                    }
                    let span = Span::new(start, self.position());
                    if !closed {
                        self.diagnostics
                            .push(Diagnostic::lexical("unterminated block comment", span));
                    }
                    self.comments.push(Comment::new(
                        CommentKind::Block,
                        String::from(&self.text[start.offset..self.pos]),
                        span,
                    ));
                }
                _ => break,
            }
        }
    }

    /// Scans a `{{ ... }}` literal, tracking double-brace depth and
    /// skipping quoted substrings so braces inside strings don't corrupt
    /// the count. The token text keeps the delimiters verbatim.
    fn scan_macro(&mut self, start: Position) -> Token {
        self.bump();
        self.bump();
        let mut depth = 1u32;
        while depth > 0 {
            match self.peek_byte() {
                None => {
                    let tok = self.slice_token(TokenType::MACRO, start);
                    self.diagnostics
                        .push(Diagnostic::lexical("unterminated macro literal", tok.span()));
                    return tok;
                }
                Some(q @ (b'\'' | b'"')) => {
                    self.bump();
                    while self.peek_byte().is_some_and(|b| b != q) {
                        self.bump();
                    }
                    self.bump();
                }
                Some(b'{') if self.peek_byte_at(1) == Some(b'{') => {
                    depth += 1;
                    self.bump();
                    self.bump();
                }
                Some(b'}') if self.peek_byte_at(1) == Some(b'}') => {
                    depth -= 1;
                    self.bump();
                    self.bump();
                }
                Some(_) => self.bump(),
            }
        }
        self.slice_token(TokenType::MACRO, start)
    }

    /// Scans a single-quoted string with doubled-quote escaping. The token
    /// text is the literal as written, quotes included.
    fn scan_string(&mut self, start: Position) -> Token {
        self.bump();
        loop {
            match self.peek_byte() {
                None => {
                    let tok = self.slice_token(TokenType::STRING, start);
                    self.diagnostics
                        .push(Diagnostic::lexical("unterminated string literal", tok.span()));
                    return tok;
                }
                Some(b'\'') => {
                    self.bump();
                    if self.peek_byte() == Some(b'\'') {
                        self.bump();
                    } else {
                        return self.slice_token(TokenType::STRING, start);
                    }
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// Scans a quoted identifier. The token text is the unescaped inner
    /// content; doubled close characters collapse to one.
    fn scan_quoted_ident(&mut self, start: Position) -> Token {
        let open = self.peek_byte().unwrap_or(b'"');
        let close = if open == self.dialect.config().quoting.open as u8 {
            self.dialect.config().quoting.close as u8
        } else {
            b'"'
        };
        self.bump();
        let mut content: Vec<u8> = Vec::new();
        loop {
            match self.peek_byte() {
                None => {
                    let text = String::from_utf8_lossy(&content).into_owned();
                    let tok = self.token(TokenType::IDENT, text, start);
                    self.diagnostics.push(Diagnostic::lexical(
                        "unterminated quoted identifier",
                        tok.span(),
                    ));
                    return tok;
                }
                Some(b) if b == close => {
                    self.bump();
                    if self.peek_byte() == Some(close) {
                        content.push(close);
                        self.bump();
                    } else {
                        let text = String::from_utf8_lossy(&content).into_owned();
                        return self.token(TokenType::IDENT, text, start);
                    }
                }
                Some(b) => {
                    content.push(b);
                    self.bump();
                }
            }
        }
    }

    /// Scans an integer, decimal, or exponent-form number, as written.
    fn scan_number(&mut self, start: Position) -> Token {
        while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.bump();
        }
        if self.peek_byte() == Some(b'.')
            && self.peek_byte_at(1).is_some_and(|b| b.is_ascii_digit())
        {
            self.bump();
            while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let after = self.peek_byte_at(1);
            let signed_digit = matches!(after, Some(b'+' | b'-'))
                && self.peek_byte_at(2).is_some_and(|b| b.is_ascii_digit());
            if after.is_some_and(|b| b.is_ascii_digit()) || signed_digit {
                self.bump();
                if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                    self.bump();
                }
                while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                    self.bump();
                }
            }
        }
        self.slice_token(TokenType::NUMBER, start)
    }

    /// Scans a bare word and classifies it: built-in keyword table, then
    /// the dialect's keyword table, then the global registry, else a plain
    /// identifier. Matching is case-insensitive; the text keeps its case.
    fn scan_word(&mut self, start: Position) -> Token {
        while self.peek_byte().is_some_and(is_ident_continue) {
            self.bump();
        }
        let text = &self.text[start.offset..self.pos];
        let upper = text.to_ascii_uppercase();
        let ty = builtin_keyword(&upper)
            .or_else(|| self.dialect.dynamic_keyword(&upper))
            .or_else(|| lookup_keyword(&upper))
            .unwrap_or(TokenType::IDENT);
        self.token(ty, String::from(text), start)
    }

    /// Scans a `$n` placeholder.
    fn scan_param(&mut self, start: Position) -> Token {
        self.bump();
        while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.bump();
        }
        self.slice_token(TokenType::PARAM, start)
    }

    /// Scans built-in single/double-character operators and punctuation.
    fn scan_operator(&mut self, start: Position) -> Token {
        let b = self.peek_byte().unwrap_or(0);
        self.bump();
        let two = |lexer: &mut Self, ty: TokenType| {
            lexer.bump();
            lexer.slice_token(ty, start)
        };
        match b {
            b'=' => self.slice_token(TokenType::EQ, start),
            b'<' => match self.peek_byte() {
                Some(b'=') => two(self, TokenType::LTE),
                Some(b'>') => two(self, TokenType::NEQ),
                _ => self.slice_token(TokenType::LT, start),
            },
            b'>' => match self.peek_byte() {
                Some(b'=') => two(self, TokenType::GTE),
                _ => self.slice_token(TokenType::GT, start),
            },
            b'!' => match self.peek_byte() {
                Some(b'=') => two(self, TokenType::NEQ),
                _ => self.illegal(start, "unexpected character `!`"),
            },
            b'|' => match self.peek_byte() {
                Some(b'|') => two(self, TokenType::CONCAT),
                _ => self.illegal(start, "unexpected character `|`"),
            },
            b':' => match self.peek_byte() {
                Some(b':') => two(self, TokenType::DOUBLE_COLON),
                _ => self.slice_token(TokenType::COLON, start),
            },
            b'+' => self.slice_token(TokenType::PLUS, start),
            b'-' => self.slice_token(TokenType::MINUS, start),
            b'*' => self.slice_token(TokenType::ASTERISK, start),
            b'/' => self.slice_token(TokenType::SLASH, start),
            b'%' => self.slice_token(TokenType::PERCENT, start),
            b',' => self.slice_token(TokenType::COMMA, start),
            b';' => self.slice_token(TokenType::SEMICOLON, start),
            b'.' => self.slice_token(TokenType::DOT, start),
            b'(' => self.slice_token(TokenType::LPAREN, start),
            b')' => self.slice_token(TokenType::RPAREN, start),
            b'[' => self.slice_token(TokenType::LBRACKET, start),
            b']' => self.slice_token(TokenType::RBRACKET, start),
            b'{' => self.slice_token(TokenType::LBRACE, start),
            b'}' => self.slice_token(TokenType::RBRACE, start),
            b'?' => self.slice_token(TokenType::QUESTION, start),
            _ => {
                let tok = self.slice_token(TokenType::ILLEGAL, start);
                self.diagnostics.push(Diagnostic::lexical(
                    format!("unexpected character `{}`", tok.text),
                    tok.span(),
                ));
                tok
            }
        }
    }
}

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

const fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
