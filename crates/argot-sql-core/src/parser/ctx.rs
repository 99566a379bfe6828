//! The restricted parser surface handed to dialect handlers.

use crate::ast::{Expr, OrderByItem, WindowDef, WindowSpec};
use crate::dialect::Dialect;
use crate::lexer::{Position, Span, Token, TokenType};

use super::error::Diagnostic;
use super::parser::Parser;

/// What a dialect handler may do with the parser: inspect and consume
/// tokens, parse sub-expressions and the common comma-separated shapes,
/// and report errors. Deliberately not the whole parser; handlers that
/// need more than this are doing the core's job.
pub struct ClauseCtx<'a, 'd> {
    parser: &'a mut Parser<'d>,
}

impl<'a, 'd> ClauseCtx<'a, 'd> {
    pub(super) fn new(parser: &'a mut Parser<'d>) -> Self {
        Self { parser }
    }

    /// The current token. Saturates at EOF.
    #[must_use]
    pub fn cur(&self) -> &Token {
        self.parser.cur()
    }

    /// The token after the current one.
    #[must_use]
    pub fn peek(&self) -> &Token {
        self.parser.peek()
    }

    /// The token two ahead of the current one.
    #[must_use]
    pub fn peek2(&self) -> &Token {
        self.parser.peek2()
    }

    /// Returns true if the current token has type `ty`.
    #[must_use]
    pub fn at(&self, ty: TokenType) -> bool {
        self.parser.at(ty)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Token {
        self.parser.advance()
    }

    /// Consumes the current token if it has type `ty`.
    pub fn eat(&mut self, ty: TokenType) -> bool {
        self.parser.eat(ty)
    }

    /// Consumes a token of type `ty` or fails with a syntax diagnostic.
    pub fn expect(&mut self, ty: TokenType) -> Result<Token, Diagnostic> {
        self.parser.expect(ty)
    }

    /// Consumes an identifier token, described as `what` in the error.
    pub fn parse_identifier(&mut self, what: &str) -> Result<String, Diagnostic> {
        self.parser.expect_ident(what)
    }

    /// Parses `AS name` or a bare trailing identifier.
    pub fn parse_alias(&mut self) -> Option<String> {
        self.parser.parse_alias()
    }

    /// Parses one expression.
    pub fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        self.parser.parse_expr()
    }

    /// Parses a comma-separated expression list.
    pub fn parse_expr_list(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        self.parser.parse_expr_list()
    }

    /// Parses comma-separated ORDER BY items with their direction and
    /// null-placement suffixes.
    pub fn parse_order_items(&mut self) -> Result<Vec<OrderByItem>, Diagnostic> {
        self.parser.parse_order_items()
    }

    /// Parses comma-separated `name AS (...)` window definitions.
    pub fn parse_window_defs(&mut self) -> Result<Vec<WindowDef>, Diagnostic> {
        self.parser.parse_window_defs()
    }

    /// Parses a window specification, either a name or the inline
    /// parenthesized form.
    pub fn parse_window_spec(&mut self) -> Result<WindowSpec, Diagnostic> {
        self.parser.parse_window_spec()
    }

    /// The dialect this parse runs under.
    #[must_use]
    pub fn dialect(&self) -> &'d Dialect {
        self.parser.dialect()
    }

    /// End position of the last consumed token.
    #[must_use]
    pub fn prev_end(&self) -> Position {
        self.parser.prev_end()
    }

    /// Span from `start` to the end of the last consumed token.
    #[must_use]
    pub fn span_from(&self, start: Position) -> Span {
        self.parser.span_from(start)
    }

    /// Builds a syntax diagnostic at the current token without failing
    /// the handler.
    #[must_use]
    pub fn error_here(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::syntax(message, self.cur().span())
    }

    /// Records a diagnostic and keeps going. Use for recoverable issues;
    /// return `Err` to abandon the construct instead.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.parser.report(diagnostic);
    }
}
