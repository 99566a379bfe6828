//! Expression parsing by precedence climbing.
//!
//! Each binding level is its own method, tightest at the bottom. The
//! structural predicates (`AND`/`OR`/`NOT`, `IN`, `BETWEEN`, `IS`, the
//! LIKE family) are wired into their levels directly; plain binary
//! operators are resolved through the dialect's operator table, so a
//! dialect that registers `//` at multiply precedence slots in next to
//! `*` without the core knowing the symbol.

use crate::ast::{
    CaseWhen, Expr, FrameBound, FrameKind, FrameSpec, InSet, LiteralKind, OrderByItem, WindowDef,
    WindowSpec,
};
use crate::dialect::Precedence;
use crate::lexer::{Span, Token, TokenType};

use super::ctx::ClauseCtx;
use super::error::Diagnostic;
use super::parser::Parser;

impl<'d> Parser<'d> {
    /// Parses one expression at the loosest binding level.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_or()
    }

    /// Parses a comma-separated expression list (at least one element).
    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(TokenType::COMMA) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_or(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_and()?;
        while self.at(TokenType::OR) {
            let op = self.advance().ty;
            let right = self.parse_and()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_not()?;
        while self.at(TokenType::AND) {
            let op = self.advance().ty;
            let right = self.parse_not()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, Diagnostic> {
        if !self.at(TokenType::NOT) {
            return self.parse_comparison();
        }
        let not_tok = self.advance();
        let operand = self.parse_not()?;
        // `NOT EXISTS (...)` folds into the Exists node instead of
        // wrapping it.
        if let Expr::Exists { not, stmt, span } = operand {
            return Ok(Expr::Exists {
                not: !not,
                stmt,
                span: Span::new(not_tok.pos, span.end),
            });
        }
        let span = Span::new(not_tok.pos, operand.span().end);
        Ok(Expr::Unary {
            op: TokenType::NOT,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_addition()?;
        loop {
            let ty = self.cur().ty;
            if ty == TokenType::NOT {
                let next = self.peek().ty;
                if next == TokenType::IN
                    || next == TokenType::BETWEEN
                    || self.dialect().is_like_operator(next)
                {
                    self.advance();
                    left = self.parse_predicate_tail(left, true)?;
                    continue;
                }
                break;
            }
            if ty == TokenType::IN
                || ty == TokenType::BETWEEN
                || ty == TokenType::IS
                || self.dialect().is_like_operator(ty)
            {
                left = self.parse_predicate_tail(left, false)?;
                continue;
            }
            match self.dispatch_infix(left, Precedence::Comparison, Self::parse_addition)? {
                Dispatched::Yes(expr) => left = expr,
                Dispatched::No(expr) => return Ok(expr),
            }
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_multiply()?;
        loop {
            match self.dispatch_infix(left, Precedence::Addition, Self::parse_multiply)? {
                Dispatched::Yes(expr) => left = expr,
                Dispatched::No(expr) => return Ok(expr),
            }
        }
    }

    fn parse_multiply(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_unary()?;
        loop {
            match self.dispatch_infix(left, Precedence::Multiply, Self::parse_unary)? {
                Dispatched::Yes(expr) => left = expr,
                Dispatched::No(expr) => return Ok(expr),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        if self.at(TokenType::MINUS) || self.at(TokenType::PLUS) {
            let op_tok = self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(op_tok.pos, operand.span().end);
            return Ok(Expr::Unary {
                op: op_tok.ty,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_primary()?;
        loop {
            match self.dispatch_infix(left, Precedence::Postfix, Self::parse_primary)? {
                Dispatched::Yes(expr) => left = expr,
                Dispatched::No(expr) => return Ok(expr),
            }
        }
    }

    /// Tries one operator of the dialect's table at exactly `level`.
    /// Custom handlers take over from their trigger token onward; plain
    /// operators become `Binary` with `next` parsing the right side.
    fn dispatch_infix(
        &mut self,
        left: Expr,
        level: Precedence,
        next: fn(&mut Self) -> Result<Expr, Diagnostic>,
    ) -> Result<Dispatched, Diagnostic> {
        let ty = self.cur().ty;
        let dialect = self.dialect();
        if dialect.precedence_of(ty) != level {
            return Ok(Dispatched::No(left));
        }
        let handler = dialect.operator(ty).and_then(|op| op.handler.clone());
        if let Some(handler) = handler {
            let mut ctx = ClauseCtx::new(self);
            return Ok(Dispatched::Yes(handler(&mut ctx, left)?));
        }
        let op = self.advance().ty;
        let right = next(self)?;
        Ok(Dispatched::Yes(binary(left, op, right)))
    }

    /// The `IN` / `BETWEEN` / `IS` / LIKE-family tail, after the optional
    /// leading `NOT` was consumed.
    fn parse_predicate_tail(&mut self, left: Expr, not: bool) -> Result<Expr, Diagnostic> {
        let start = left.span().start;
        match self.cur().ty {
            TokenType::IN => {
                self.advance();
                self.expect(TokenType::LPAREN)?;
                let set = if self.at(TokenType::SELECT) || self.at(TokenType::WITH) {
                    InSet::Subquery(Box::new(self.parse_select_stmt()))
                } else {
                    match self.parse_expr_list() {
                        Ok(values) => InSet::Values(values),
                        Err(diagnostic) => {
                            self.skip_to_paren_close();
                            return Err(diagnostic);
                        }
                    }
                };
                self.expect(TokenType::RPAREN)?;
                Ok(Expr::In {
                    expr: Box::new(left),
                    not,
                    set,
                    span: self.span_from(start),
                })
            }
            TokenType::BETWEEN => {
                self.advance();
                let low = self.parse_addition()?;
                self.expect(TokenType::AND)?;
                let high = self.parse_addition()?;
                Ok(Expr::Between {
                    expr: Box::new(left),
                    not,
                    low: Box::new(low),
                    high: Box::new(high),
                    span: self.span_from(start),
                })
            }
            TokenType::IS => {
                self.advance();
                let negated = self.eat(TokenType::NOT);
                if self.eat(TokenType::NULL) {
                    return Ok(Expr::IsNull {
                        expr: Box::new(left),
                        not: negated,
                        span: self.span_from(start),
                    });
                }
                if self.at(TokenType::TRUE) || self.at(TokenType::FALSE) {
                    let value = self.advance().ty == TokenType::TRUE;
                    return Ok(Expr::IsBool {
                        expr: Box::new(left),
                        not: negated,
                        value,
                        span: self.span_from(start),
                    });
                }
                let tok = self.cur().clone();
                Err(Diagnostic::syntax(
                    format!("expected NULL, TRUE, or FALSE after IS, found {}", tok.ty),
                    tok.span(),
                ))
            }
            ty if self.dialect().is_like_operator(ty) => {
                let op = self.advance().ty;
                let pattern = self.parse_addition()?;
                Ok(Expr::Like {
                    expr: Box::new(left),
                    not,
                    op,
                    pattern: Box::new(pattern),
                    span: self.span_from(start),
                })
            }
            _ => {
                let tok = self.cur().clone();
                Err(Diagnostic::syntax(
                    format!("expected a predicate, found {}", tok.ty),
                    tok.span(),
                ))
            }
        }
    }

    // ---- primaries ----------------------------------------------------

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        while self.at(TokenType::ILLEGAL) {
            // Already diagnosed by the lexer; skip rather than report twice.
            self.advance();
        }
        let dialect = self.dialect();
        if let Some(handler) = dialect.prefix(self.cur().ty) {
            let handler = handler.clone();
            let mut ctx = ClauseCtx::new(self);
            return handler(&mut ctx);
        }
        let tok = self.cur().clone();
        match tok.ty {
            TokenType::NUMBER => self.literal(LiteralKind::Number),
            TokenType::STRING => self.literal(LiteralKind::String),
            TokenType::TRUE | TokenType::FALSE => self.literal(LiteralKind::Bool),
            TokenType::NULL => self.literal(LiteralKind::Null),
            TokenType::MACRO => {
                let tok = self.advance();
                Ok(Expr::Macro {
                    raw: tok.text,
                    span: Span::new(tok.pos, tok.end),
                })
            }
            TokenType::PARAM | TokenType::QUESTION => {
                let tok = self.advance();
                Ok(Expr::Placeholder {
                    text: tok.text,
                    span: Span::new(tok.pos, tok.end),
                })
            }
            TokenType::ASTERISK => {
                let tok = self.advance();
                Ok(Expr::Star {
                    table: None,
                    span: Span::new(tok.pos, tok.end),
                })
            }
            TokenType::CASE => self.parse_case(),
            TokenType::CAST => self.parse_cast(),
            TokenType::EXISTS => {
                let start = self.advance().pos;
                self.expect(TokenType::LPAREN)?;
                let stmt = Box::new(self.parse_select_stmt());
                self.expect(TokenType::RPAREN)?;
                Ok(Expr::Exists {
                    not: false,
                    stmt,
                    span: self.span_from(start),
                })
            }
            TokenType::LPAREN => self.parse_paren(),
            TokenType::IDENT => self.parse_name_start(),
            _ => Err(Diagnostic::syntax(
                format!("expected an expression, found {}", tok.ty),
                tok.span(),
            )),
        }
    }

    fn literal(&mut self, kind: LiteralKind) -> Result<Expr, Diagnostic> {
        let tok = self.advance();
        Ok(Expr::Literal {
            kind,
            text: tok.text,
            span: Span::new(tok.pos, tok.end),
        })
    }

    /// `( ... )`: a subquery, a single grouped expression, or a row value
    /// kept as a comma chain under one `Paren`.
    fn parse_paren(&mut self) -> Result<Expr, Diagnostic> {
        let start = self.advance().pos;
        if self.at(TokenType::SELECT) || self.at(TokenType::WITH) {
            let stmt = Box::new(self.parse_select_stmt());
            self.expect(TokenType::RPAREN)?;
            return Ok(Expr::Subquery {
                stmt,
                span: self.span_from(start),
            });
        }
        let exprs = if self.at(TokenType::RPAREN) {
            Vec::new()
        } else {
            match self.parse_expr_list() {
                Ok(exprs) => exprs,
                Err(diagnostic) => {
                    self.skip_to_paren_close();
                    return Err(diagnostic);
                }
            }
        };
        self.expect(TokenType::RPAREN)?;
        let mut iter = exprs.into_iter().rev();
        let Some(mut chain) = iter.next() else {
            return Err(Diagnostic::syntax(
                String::from("empty parenthesized expression"),
                self.span_from(start),
            ));
        };
        for expr in iter {
            chain = binary(expr, TokenType::COMMA, chain);
        }
        Ok(Expr::Paren {
            inner: Box::new(chain),
            span: self.span_from(start),
        })
    }

    /// Everything that starts with an identifier: plain and qualified
    /// column references, `table.*`, and function calls. References
    /// deeper than two parts collapse to their last two, a compatibility
    /// carry-over from engines without catalog support.
    fn parse_name_start(&mut self) -> Result<Expr, Diagnostic> {
        let first = self.advance();
        if self.at(TokenType::LPAREN) {
            return self.parse_func_call(first);
        }
        if !self.at(TokenType::DOT) {
            return Ok(Expr::ColumnRef {
                table: None,
                column: first.text,
                span: Span::new(first.pos, first.end),
            });
        }
        let start = first.pos;
        let mut qualifier = first.text;
        self.advance();
        loop {
            if self.at(TokenType::ASTERISK) {
                self.advance();
                return Ok(Expr::Star {
                    table: Some(qualifier),
                    span: self.span_from(start),
                });
            }
            let part = self.expect_ident("identifier after `.`")?;
            if self.at(TokenType::DOT) {
                // Catalog fold: only the last two parts survive.
                self.advance();
                qualifier = part;
                continue;
            }
            return Ok(Expr::ColumnRef {
                table: Some(qualifier),
                column: part,
                span: self.span_from(start),
            });
        }
    }

    fn parse_func_call(&mut self, name: Token) -> Result<Expr, Diagnostic> {
        let start = name.pos;
        self.advance();
        let distinct = self.eat(TokenType::DISTINCT);
        let mut star = false;
        let mut args = Vec::new();
        if self.at(TokenType::ASTERISK) && self.peek().ty == TokenType::RPAREN {
            star = true;
            self.advance();
        } else if !self.at(TokenType::RPAREN) {
            args = match self.parse_expr_list() {
                Ok(args) => args,
                Err(diagnostic) => {
                    self.skip_to_paren_close();
                    return Err(diagnostic);
                }
            };
        }
        self.expect(TokenType::RPAREN)?;

        let filter = if self.at(TokenType::FILTER) {
            self.advance();
            self.expect(TokenType::LPAREN)?;
            self.expect(TokenType::WHERE)?;
            let cond = self.parse_expr()?;
            self.expect(TokenType::RPAREN)?;
            Some(Box::new(cond))
        } else {
            None
        };

        let window = if self.at(TokenType::OVER) {
            self.advance();
            Some(self.parse_window_spec()?)
        } else {
            None
        };

        Ok(Expr::FuncCall {
            name: name.text,
            distinct,
            star,
            args,
            filter,
            window,
            span: self.span_from(start),
        })
    }

    fn parse_case(&mut self) -> Result<Expr, Diagnostic> {
        let start = self.advance().pos;
        let operand = if self.at(TokenType::WHEN) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut whens = Vec::new();
        while self.at(TokenType::WHEN) {
            let when_start = self.advance().pos;
            let condition = self.parse_expr()?;
            self.expect(TokenType::THEN)?;
            let result = self.parse_expr()?;
            whens.push(CaseWhen {
                condition,
                result,
                span: self.span_from(when_start),
            });
        }
        if whens.is_empty() {
            let tok = self.cur().clone();
            return Err(Diagnostic::syntax(
                format!("expected WHEN in CASE expression, found {}", tok.ty),
                tok.span(),
            ));
        }
        let else_expr = if self.eat(TokenType::ELSE) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect(TokenType::END)?;
        Ok(Expr::Case {
            operand,
            whens,
            else_expr,
            span: self.span_from(start),
        })
    }

    fn parse_cast(&mut self) -> Result<Expr, Diagnostic> {
        let start = self.advance().pos;
        self.expect(TokenType::LPAREN)?;
        let expr = self.parse_expr()?;
        self.expect(TokenType::AS)?;
        let type_name = self.parse_type_name()?;
        self.expect(TokenType::RPAREN)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            type_name,
            span: self.span_from(start),
        })
    }

    /// A type name: one or more identifier words plus an optional
    /// argument list, normalized to `BASE WORDS(a, b)` spelling.
    pub(super) fn parse_type_name(&mut self) -> Result<String, Diagnostic> {
        let mut name = self.expect_ident("type name")?;
        while self.at(TokenType::IDENT) {
            let word = self.advance().text;
            name.push(' ');
            name.push_str(&word);
        }
        if self.eat(TokenType::LPAREN) {
            name.push('(');
            loop {
                let tok = self.cur().clone();
                if tok.ty == TokenType::NUMBER || tok.ty == TokenType::IDENT {
                    self.advance();
                    name.push_str(&tok.text);
                } else {
                    return Err(Diagnostic::syntax(
                        format!("expected a type argument, found {}", tok.ty),
                        tok.span(),
                    ));
                }
                if self.eat(TokenType::COMMA) {
                    name.push_str(", ");
                    continue;
                }
                break;
            }
            self.expect(TokenType::RPAREN)?;
            name.push(')');
        }
        Ok(name)
    }

    // ---- windows and ordering -----------------------------------------

    /// A window spec after `OVER`: a bare reference to a named window, or
    /// the parenthesized inline form.
    pub(super) fn parse_window_spec(&mut self) -> Result<WindowSpec, Diagnostic> {
        let start = self.cur().pos;
        if self.at(TokenType::IDENT) {
            let name = self.advance();
            return Ok(WindowSpec {
                name: Some(name.text),
                partition_by: Vec::new(),
                order_by: Vec::new(),
                frame: None,
                span: Span::new(name.pos, name.end),
            });
        }
        self.expect(TokenType::LPAREN)?;
        let mut partition_by = Vec::new();
        if self.at(TokenType::PARTITION) {
            self.advance();
            self.expect(TokenType::BY)?;
            partition_by = self.parse_expr_list()?;
        }
        let mut order_by = Vec::new();
        if self.at(TokenType::ORDER) {
            self.advance();
            self.expect(TokenType::BY)?;
            order_by = self.parse_order_items()?;
        }
        let frame = self.parse_frame_spec()?;
        self.expect(TokenType::RPAREN)?;
        Ok(WindowSpec {
            name: None,
            partition_by,
            order_by,
            frame,
            span: self.span_from(start),
        })
    }

    fn parse_frame_spec(&mut self) -> Result<Option<FrameSpec>, Diagnostic> {
        let kind = match self.cur().ty {
            TokenType::ROWS => FrameKind::Rows,
            TokenType::RANGE => FrameKind::Range,
            TokenType::GROUPS => FrameKind::Groups,
            _ => return Ok(None),
        };
        let start = self.advance().pos;
        let (lo, hi) = if self.eat(TokenType::BETWEEN) {
            let lo = self.parse_frame_bound()?;
            self.expect(TokenType::AND)?;
            let hi = self.parse_frame_bound()?;
            (lo, Some(hi))
        } else {
            (self.parse_frame_bound()?, None)
        };
        Ok(Some(FrameSpec {
            kind,
            start: lo,
            end: hi,
            span: self.span_from(start),
        }))
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, Diagnostic> {
        if self.eat(TokenType::UNBOUNDED) {
            if self.eat(TokenType::PRECEDING) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            if self.eat(TokenType::FOLLOWING) {
                return Ok(FrameBound::UnboundedFollowing);
            }
            let tok = self.cur().clone();
            return Err(Diagnostic::syntax(
                format!(
                    "expected PRECEDING or FOLLOWING after UNBOUNDED, found {}",
                    tok.ty
                ),
                tok.span(),
            ));
        }
        if self.eat(TokenType::CURRENT) {
            self.expect(TokenType::ROW)?;
            return Ok(FrameBound::CurrentRow);
        }
        let offset = self.parse_addition()?;
        if self.eat(TokenType::PRECEDING) {
            return Ok(FrameBound::Preceding(Box::new(offset)));
        }
        if self.eat(TokenType::FOLLOWING) {
            return Ok(FrameBound::Following(Box::new(offset)));
        }
        let tok = self.cur().clone();
        Err(Diagnostic::syntax(
            format!("expected PRECEDING or FOLLOWING, found {}", tok.ty),
            tok.span(),
        ))
    }

    /// `expr [ASC | DESC] [NULLS FIRST | NULLS LAST]`, comma-separated.
    pub(super) fn parse_order_items(&mut self) -> Result<Vec<OrderByItem>, Diagnostic> {
        let mut items = Vec::new();
        loop {
            let start = self.cur().pos;
            let expr = self.parse_expr()?;
            let asc = if self.eat(TokenType::ASC) {
                Some(true)
            } else if self.eat(TokenType::DESC) {
                Some(false)
            } else {
                None
            };
            let nulls_first = if self.eat(TokenType::NULLS) {
                if self.eat(TokenType::FIRST) {
                    Some(true)
                } else if self.eat(TokenType::LAST) {
                    Some(false)
                } else {
                    let tok = self.cur().clone();
                    return Err(Diagnostic::syntax(
                        format!("expected FIRST or LAST after NULLS, found {}", tok.ty),
                        tok.span(),
                    ));
                }
            } else {
                None
            };
            items.push(OrderByItem {
                expr,
                asc,
                nulls_first,
                span: self.span_from(start),
            });
            if !self.eat(TokenType::COMMA) {
                break;
            }
        }
        Ok(items)
    }

    /// `name AS (window spec)`, comma-separated, for the WINDOW clause.
    pub(super) fn parse_window_defs(&mut self) -> Result<Vec<WindowDef>, Diagnostic> {
        let mut defs = Vec::new();
        loop {
            let start = self.cur().pos;
            let name = self.expect_ident("window name")?;
            self.expect(TokenType::AS)?;
            if !self.at(TokenType::LPAREN) {
                let tok = self.cur().clone();
                return Err(Diagnostic::syntax(
                    format!("expected ( to open a window definition, found {}", tok.ty),
                    tok.span(),
                ));
            }
            let spec = self.parse_window_spec()?;
            defs.push(WindowDef {
                name,
                spec,
                span: self.span_from(start),
            });
            if !self.eat(TokenType::COMMA) {
                break;
            }
        }
        Ok(defs)
    }
}

/// Infix dispatch outcome: whether an operator at the requested level was
/// consumed.
enum Dispatched {
    Yes(Expr),
    No(Expr),
}

fn binary(left: Expr, op: TokenType, right: Expr) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    }
}
