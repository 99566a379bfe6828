//! Statement- and clause-level parsing.
//!
//! The parser is recursive descent over a pre-lexed token buffer with a
//! three-token window (`cur`/`peek`/`peek2`), enough to split `table.*`
//! from `table.column` without backtracking. Clause parsing is entirely
//! dialect-driven: the only clause the core knows by name is `SELECT ...
//! FROM`; everything after that dispatches through the active dialect's
//! clause table, with cross-dialect rejections produced from the global
//! clause registry. Errors accumulate; parsing always yields a tree.

use crate::ast::{
    CommentSet, Cte, Expr, FromClause, Join, SelectBody, SelectCore, SelectItem, SelectItemKind,
    SelectStmt, SetOp, SetOpKind, TableRef, WithClause,
};
use crate::dialect::{
    clause_display_name, is_registered_clause_token, ClauseSlot, ClauseValue, Dialect,
};
use crate::lexer::{Comment, Lexer, Position, Span, Token, TokenType};

use super::ctx::ClauseCtx;
use super::error::{Diagnostic, ParseFailure};

/// The outcome of a parse: the (possibly partial) tree, the comments, and
/// every diagnostic found along the way.
#[derive(Debug, Clone)]
pub struct Parse {
    pub stmt: SelectStmt,
    pub comments: Vec<Comment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Returns true if no diagnostics were produced.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parses `src` under `dialect`, failing if any diagnostic was produced.
///
/// Call sites that can use a partial tree should go through
/// [`Parser::parse`] instead, which always returns one.
pub fn parse_sql(src: &str, dialect: &Dialect) -> Result<Parse, ParseFailure> {
    let parse = Parser::new(src, dialect).parse();
    match ParseFailure::from_diagnostics(parse.diagnostics.clone()) {
        Some(failure) => Err(failure),
        None => Ok(parse),
    }
}

/// A single-statement parser over source text and an active dialect.
pub struct Parser<'d> {
    dialect: &'d Dialect,
    tokens: Vec<Token>,
    idx: usize,
    comments: Vec<Comment>,
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl<'d> Parser<'d> {
    /// Lexes `src` under `dialect` and readies the parser.
    #[must_use]
    pub fn new(src: &str, dialect: &'d Dialect) -> Self {
        let lexed = Lexer::new(src, dialect).tokenize();
        Self {
            dialect,
            tokens: lexed.tokens,
            idx: 0,
            comments: lexed.comments,
            diagnostics: lexed.diagnostics,
        }
    }

    /// Parses one statement, consuming the parser.
    #[must_use]
    pub fn parse(mut self) -> Parse {
        let stmt = self.parse_select_stmt();
        self.eat(TokenType::SEMICOLON);
        while self.cur().ty == TokenType::ILLEGAL {
            // Already diagnosed by the lexer.
            self.advance();
        }
        if !self.cur().is_eof() {
            let tok = self.cur().clone();
            self.diagnostics.push(Diagnostic::syntax(
                format!("unexpected trailing input starting at {}", tok.ty),
                tok.span(),
            ));
        }
        Parse {
            stmt,
            comments: self.comments,
            diagnostics: self.diagnostics,
        }
    }

    // ---- token window -------------------------------------------------

    pub(super) fn cur(&self) -> &Token {
        self.token_at(self.idx)
    }

    pub(super) fn peek(&self) -> &Token {
        self.token_at(self.idx + 1)
    }

    pub(super) fn peek2(&self) -> &Token {
        self.token_at(self.idx + 2)
    }

    fn token_at(&self, idx: usize) -> &Token {
        // The buffer always ends with EOF, which saturates the window.
        self.tokens.get(idx).unwrap_or_else(|| {
            self.tokens
                .last()
                .unwrap_or_else(|| unreachable!("lexer emits at least EOF"))
        })
    }

    pub(super) fn at(&self, ty: TokenType) -> bool {
        self.cur().ty == ty
    }

    /// Consumes and returns the current token; EOF is sticky.
    pub(super) fn advance(&mut self) -> Token {
        let tok = self.cur().clone();
        if self.idx + 1 < self.tokens.len() {
            self.idx += 1;
        }
        tok
    }

    pub(super) fn eat(&mut self, ty: TokenType) -> bool {
        if self.at(ty) {
            self.advance();
            return true;
        }
        false
    }

    pub(super) fn expect(&mut self, ty: TokenType) -> Result<Token, Diagnostic> {
        if self.at(ty) {
            return Ok(self.advance());
        }
        let cur = self.cur();
        Err(Diagnostic::syntax(
            format!("expected {}, found {}", ty, cur.ty),
            cur.span(),
        ))
    }

    /// Consumes an identifier token, described as `what` in errors.
    pub(super) fn expect_ident(&mut self, what: &str) -> Result<String, Diagnostic> {
        if self.at(TokenType::IDENT) {
            return Ok(self.advance().text);
        }
        let cur = self.cur();
        Err(Diagnostic::syntax(
            format!("expected {what}, found {}", cur.ty),
            cur.span(),
        ))
    }

    /// End position of the last consumed token.
    pub(super) fn prev_end(&self) -> Position {
        if self.idx == 0 {
            return self.cur().pos;
        }
        self.tokens[self.idx - 1].end
    }

    pub(super) fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.prev_end())
    }

    pub(super) const fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub(super) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Consumes tokens up to and including the `)` matching an already
    /// consumed `(`, skipping nested pairs whole. Used when a
    /// parenthesized construct fails mid-way, so the caller's recovery
    /// resumes after the group instead of stalling on the stray `)`.
    pub(super) fn skip_to_paren_close(&mut self) {
        let mut depth = 0usize;
        while !self.cur().is_eof() {
            let ty = self.advance().ty;
            if ty == TokenType::LPAREN {
                depth += 1;
            } else if ty == TokenType::RPAREN {
                if depth == 0 {
                    return;
                }
                depth -= 1;
            }
        }
    }

    /// Skips ahead to a token that can plausibly start the next construct:
    /// a list or group boundary, a set operation, a join, or any clause
    /// trigger of any dialect.
    pub(super) fn synchronize(&mut self) {
        while !self.cur().is_eof() {
            let ty = self.cur().ty;
            let boundary = matches!(
                ty,
                TokenType::COMMA
                    | TokenType::RPAREN
                    | TokenType::SEMICOLON
                    | TokenType::FROM
                    | TokenType::UNION
                    | TokenType::INTERSECT
                    | TokenType::EXCEPT
                    | TokenType::JOIN
            ) || self.dialect.is_clause_token(ty)
                || is_registered_clause_token(ty);
            if boundary {
                return;
            }
            self.advance();
        }
    }

    // ---- statements ---------------------------------------------------

    pub(super) fn parse_select_stmt(&mut self) -> SelectStmt {
        let start = self.cur().pos;
        let with = self.at(TokenType::WITH).then(|| self.parse_with());
        let body = self.parse_select_body();
        SelectStmt {
            with,
            body,
            span: self.span_from(start),
            comments: CommentSet::new(),
        }
    }

    fn parse_with(&mut self) -> WithClause {
        let start = self.cur().pos;
        self.advance();
        let recursive = self.eat(TokenType::RECURSIVE);
        let mut ctes = Vec::new();
        loop {
            match self.parse_cte() {
                Ok(cte) => ctes.push(cte),
                Err(diagnostic) => {
                    self.report(diagnostic);
                    self.synchronize();
                    break;
                }
            }
            if !self.eat(TokenType::COMMA) {
                break;
            }
        }
        WithClause {
            recursive,
            ctes,
            span: self.span_from(start),
            comments: CommentSet::new(),
        }
    }

    fn parse_cte(&mut self) -> Result<Cte, Diagnostic> {
        let start = self.cur().pos;
        let name = self.expect_ident("CTE name")?;
        self.expect(TokenType::AS)?;
        self.expect(TokenType::LPAREN)?;
        let query = self.parse_select_stmt();
        self.expect(TokenType::RPAREN)?;
        Ok(Cte {
            name,
            query,
            span: self.span_from(start),
            comments: CommentSet::new(),
        })
    }

    fn parse_select_body(&mut self) -> SelectBody {
        let start = self.cur().pos;
        let left = self.parse_select_core();
        let kind = match self.cur().ty {
            TokenType::UNION => Some(SetOpKind::Union),
            TokenType::INTERSECT => Some(SetOpKind::Intersect),
            TokenType::EXCEPT => Some(SetOpKind::Except),
            _ => None,
        };
        let (op, right) = if let Some(kind) = kind {
            self.advance();
            let all = self.eat(TokenType::ALL);
            if !all {
                self.eat(TokenType::DISTINCT);
            }
            // `BY NAME` is soft: `NAME` is an ordinary identifier that only
            // means by-name matching right here.
            let by_name = self.at(TokenType::BY)
                && self.peek().ty == TokenType::IDENT
                && self.peek().text_is("NAME");
            if by_name {
                self.advance();
                self.advance();
            }
            let right = self.parse_select_body();
            (Some(SetOp { kind, all, by_name }), Some(Box::new(right)))
        } else {
            (None, None)
        };
        SelectBody {
            left,
            op,
            right,
            span: self.span_from(start),
            comments: CommentSet::new(),
        }
    }

    fn parse_select_core(&mut self) -> SelectCore {
        let start = self.cur().pos;
        let mut core = SelectCore::default();

        if !self.at(TokenType::SELECT) {
            let tok = self.cur().clone();
            self.report(Diagnostic::syntax(
                format!("expected SELECT, found {}", tok.ty),
                tok.span(),
            ));
            while !self.at(TokenType::SELECT) && !self.cur().is_eof() {
                self.advance();
            }
            if self.cur().is_eof() {
                core.span = self.span_from(start);
                return core;
            }
        }
        self.advance();

        if self.eat(TokenType::DISTINCT) {
            core.distinct = true;
        } else {
            self.eat(TokenType::ALL);
        }

        loop {
            if let Some(item) = self.parse_select_item() {
                core.items.push(item);
            }
            if !self.eat(TokenType::COMMA) {
                break;
            }
        }

        if self.at(TokenType::FROM) {
            let from_pos = self.advance().pos;
            core.from = Some(self.parse_from_clause(from_pos));
        }

        self.run_clause_loop(&mut core);
        core.span = self.span_from(start);
        core
    }

    /// The clause-resolution loop: dispatch through the dialect's clause
    /// table, reject clauses other dialects own, stop on anything else.
    fn run_clause_loop(&mut self, core: &mut SelectCore) {
        loop {
            let ty = self.cur().ty;
            if ty == TokenType::EOF {
                return;
            }
            let dialect = self.dialect;
            if let Some(def) = dialect.clause_for(ty) {
                let display_name = def.display.clone();
                let slot = def.slot;
                let handler = def.handler.clone();
                let keyword = self.advance();
                tracing::trace!(
                    clause = display_name.as_str(),
                    dialect = dialect.name(),
                    "dispatching clause"
                );
                let mut ctx = ClauseCtx::new(self);
                match handler(&mut ctx) {
                    Ok(value) => self.assign_clause(core, slot, &display_name, value, keyword.span()),
                    Err(diagnostic) => {
                        self.report(diagnostic);
                        self.synchronize();
                    }
                }
                continue;
            }
            if is_registered_clause_token(ty) {
                let name = clause_display_name(ty).unwrap_or_else(|| ty.name());
                let tok = self.cur().clone();
                tracing::trace!(
                    clause = name.as_str(),
                    dialect = dialect.name(),
                    "rejecting clause"
                );
                self.report(Diagnostic::rejection(
                    format!("{name} is not supported in {} dialect", dialect.name()),
                    tok.span(),
                ));
                // Skip the clause body so later clauses still parse.
                self.advance();
                self.synchronize();
                continue;
            }
            return;
        }
    }

    /// Routes a handler result to its destination field. Single-value
    /// slots diagnose duplicates and keep the later value.
    fn assign_clause(
        &mut self,
        core: &mut SelectCore,
        slot: ClauseSlot,
        display: &str,
        value: ClauseValue,
        keyword_span: Span,
    ) {
        let mut duplicate = false;
        match (slot, value) {
            (ClauseSlot::Where, ClauseValue::Expr(e)) => {
                duplicate = core.where_clause.is_some();
                core.where_clause = Some(e);
            }
            (ClauseSlot::GroupBy, ClauseValue::Exprs(es)) => {
                duplicate = !core.group_by.is_empty() || core.group_by_all;
                core.group_by = es;
                core.group_by_all = false;
            }
            (ClauseSlot::GroupBy, ClauseValue::All { .. }) => {
                duplicate = !core.group_by.is_empty() || core.group_by_all;
                core.group_by.clear();
                core.group_by_all = true;
            }
            (ClauseSlot::Having, ClauseValue::Expr(e)) => {
                duplicate = core.having.is_some();
                core.having = Some(e);
            }
            (ClauseSlot::Window, ClauseValue::Windows(ws)) => {
                core.windows.extend(ws);
            }
            (ClauseSlot::OrderBy, ClauseValue::OrderBy(items)) => {
                duplicate = !core.order_by.is_empty() || core.order_by_all;
                core.order_by = items;
                core.order_by_all = false;
            }
            (ClauseSlot::OrderBy, ClauseValue::All { desc }) => {
                duplicate = !core.order_by.is_empty() || core.order_by_all;
                core.order_by.clear();
                core.order_by_all = true;
                core.order_by_all_desc = desc;
            }
            (ClauseSlot::Limit, ClauseValue::Expr(e)) => {
                duplicate = core.limit.is_some();
                core.limit = Some(e);
            }
            (ClauseSlot::Offset, ClauseValue::Expr(e)) => {
                duplicate = core.offset.is_some();
                core.offset = Some(e);
            }
            (ClauseSlot::Qualify, ClauseValue::Expr(e)) => {
                duplicate = core.qualify.is_some();
                core.qualify = Some(e);
            }
            (ClauseSlot::Fetch, ClauseValue::Expr(e)) => {
                duplicate = core.fetch.is_some();
                core.fetch = Some(e);
            }
            (ClauseSlot::Extensions, ClauseValue::Extension(ext)) => {
                core.extensions.push(ext);
            }
            (_, _) => {
                self.report(Diagnostic::syntax(
                    format!("{display} clause produced a value that does not fit its slot"),
                    keyword_span,
                ));
            }
        }
        if duplicate {
            self.report(Diagnostic::syntax(
                format!("duplicate {display} clause"),
                keyword_span,
            ));
        }
    }

    // ---- select list --------------------------------------------------

    fn parse_select_item(&mut self) -> Option<SelectItem> {
        let start = self.cur().pos;
        let kind = if self.eat(TokenType::ASTERISK) {
            SelectItemKind::Star
        } else if self.cur().ty == TokenType::IDENT
            && self.peek().ty == TokenType::DOT
            && self.peek2().ty == TokenType::ASTERISK
        {
            let table = self.advance().text;
            self.advance();
            self.advance();
            SelectItemKind::TableStar { table }
        } else {
            match self.parse_expr() {
                Ok(expr) => {
                    let alias = self.parse_alias();
                    SelectItemKind::Expr { expr, alias }
                }
                Err(diagnostic) => {
                    self.report(diagnostic);
                    self.synchronize();
                    return None;
                }
            }
        };

        let mut modifiers = Vec::new();
        if matches!(
            kind,
            SelectItemKind::Star | SelectItemKind::TableStar { .. }
        ) {
            loop {
                let dialect = self.dialect;
                let Some(handler) = dialect.star_modifier(self.cur().ty) else {
                    break;
                };
                let handler = handler.clone();
                self.advance();
                let mut ctx = ClauseCtx::new(self);
                match handler(&mut ctx) {
                    Ok(modifier) => modifiers.push(modifier),
                    Err(diagnostic) => {
                        self.report(diagnostic);
                        self.synchronize();
                        break;
                    }
                }
            }
        }

        Some(SelectItem {
            kind,
            modifiers,
            span: self.span_from(start),
            comments: CommentSet::new(),
        })
    }

    /// `AS name`, or a bare trailing identifier (soft alias).
    pub(super) fn parse_alias(&mut self) -> Option<String> {
        if self.eat(TokenType::AS) {
            match self.expect_ident("alias after AS") {
                Ok(name) => return Some(name),
                Err(diagnostic) => {
                    self.report(diagnostic);
                    return None;
                }
            }
        }
        if self.at(TokenType::IDENT) {
            return Some(self.advance().text);
        }
        None
    }

    // ---- FROM and joins -----------------------------------------------

    fn parse_from_clause(&mut self, from_pos: Position) -> FromClause {
        let source = self.parse_table_ref();
        let mut joins = Vec::new();
        loop {
            if self.at(TokenType::COMMA) {
                let join_start = self.advance().pos;
                let right = self.parse_table_ref();
                joins.push(Join {
                    join_type: String::from("CROSS"),
                    natural: false,
                    implicit: true,
                    right,
                    condition: None,
                    using_columns: None,
                    span: self.span_from(join_start),
                    comments: CommentSet::new(),
                });
                continue;
            }
            let join_start = self.cur().pos;
            let natural = self.eat(TokenType::NATURAL);
            let Some((name, requires_on, allows_using)) = self.parse_join_head(natural) else {
                break;
            };
            let right = self.parse_table_ref();
            let (condition, using_columns) =
                self.parse_join_condition(&name, natural, requires_on, allows_using);
            joins.push(Join {
                join_type: name,
                natural,
                implicit: false,
                right,
                condition,
                using_columns,
                span: self.span_from(join_start),
                comments: CommentSet::new(),
            });
        }
        FromClause {
            source,
            joins,
            span: self.span_from(from_pos),
            comments: CommentSet::new(),
        }
    }

    /// Consumes a join's introducer tokens up to and including `JOIN`,
    /// resolving the type through the dialect's join table. Returns the
    /// type string and its condition rules, or `None` if no join starts
    /// here.
    fn parse_join_head(&mut self, natural: bool) -> Option<(String, bool, bool)> {
        let dialect = self.dialect;
        if let Some(def) = dialect.join_def(self.cur().ty) {
            let mut name = def.name.clone();
            let mut requires_on = def.requires_on;
            let mut allows_using = def.allows_using;
            let compounds = def.compound_with.clone();
            let modifier = def.modifier;
            self.advance();
            if let Some(modifier) = modifier {
                self.eat(modifier);
            }
            if compounds.contains(&self.cur().ty) {
                if let Some(second) = dialect.join_def(self.cur().ty) {
                    name = format!("{name} {}", second.name);
                    requires_on = second.requires_on;
                    allows_using = second.allows_using;
                    self.advance();
                }
            }
            if let Err(diagnostic) = self.expect(TokenType::JOIN) {
                self.report(diagnostic);
            }
            return Some((name, requires_on, allows_using));
        }
        if self.at(TokenType::JOIN) {
            // Bare `JOIN` is an inner join.
            self.advance();
            return Some((String::from("INNER"), true, true));
        }
        if natural {
            let tok = self.cur().clone();
            self.report(Diagnostic::syntax(
                format!("expected a join after NATURAL, found {}", tok.ty),
                tok.span(),
            ));
        }
        None
    }

    fn parse_join_condition(
        &mut self,
        name: &str,
        natural: bool,
        requires_on: bool,
        allows_using: bool,
    ) -> (Option<Expr>, Option<Vec<String>>) {
        if natural || !requires_on {
            // NATURAL and condition-free joins take neither ON nor USING.
            if self.at(TokenType::ON) || self.at(TokenType::USING) {
                let tok = self.cur().clone();
                let why = if natural { "a NATURAL join" } else { name };
                self.report(Diagnostic::syntax(
                    format!("{why} cannot take {}", tok.ty),
                    tok.span(),
                ));
                // Parse and drop, to stay synchronized.
                if self.eat(TokenType::ON) {
                    match self.parse_expr() {
                        Ok(_) => {}
                        Err(diagnostic) => {
                            self.report(diagnostic);
                            self.synchronize();
                        }
                    }
                } else {
                    self.advance();
                    let _ = self.parse_using_columns();
                }
            }
            return (None, None);
        }
        if self.eat(TokenType::ON) {
            match self.parse_expr() {
                Ok(expr) => return (Some(expr), None),
                Err(diagnostic) => {
                    self.report(diagnostic);
                    self.synchronize();
                    return (None, None);
                }
            }
        }
        if self.at(TokenType::USING) && allows_using {
            self.advance();
            return (None, self.parse_using_columns());
        }
        let tok = self.cur().clone();
        self.report(Diagnostic::syntax(
            format!("expected ON or USING after {name} JOIN, found {}", tok.ty),
            tok.span(),
        ));
        (None, None)
    }

    fn parse_using_columns(&mut self) -> Option<Vec<String>> {
        if let Err(diagnostic) = self.expect(TokenType::LPAREN) {
            self.report(diagnostic);
            return None;
        }
        let mut columns = Vec::new();
        loop {
            match self.expect_ident("column name in USING") {
                Ok(name) => columns.push(name),
                Err(diagnostic) => {
                    self.report(diagnostic);
                    self.synchronize();
                    break;
                }
            }
            if !self.eat(TokenType::COMMA) {
                break;
            }
        }
        if let Err(diagnostic) = self.expect(TokenType::RPAREN) {
            self.report(diagnostic);
        }
        Some(columns)
    }

    pub(super) fn parse_table_ref(&mut self) -> TableRef {
        let start = self.cur().pos;
        let mut base = self.parse_base_table_ref(start);
        loop {
            let dialect = self.dialect;
            let Some(handler) = dialect.from_item(self.cur().ty) else {
                break;
            };
            let handler = handler.clone();
            self.advance();
            let mut ctx = ClauseCtx::new(self);
            match handler(&mut ctx, base) {
                Ok(wrapped) => base = wrapped,
                Err(diagnostic) => {
                    self.report(diagnostic);
                    self.synchronize();
                    return TableRef::Named {
                        catalog: None,
                        schema: None,
                        name: String::new(),
                        alias: None,
                        span: self.span_from(start),
                        comments: CommentSet::new(),
                    };
                }
            }
        }
        base
    }

    fn parse_base_table_ref(&mut self, start: Position) -> TableRef {
        if self.eat(TokenType::LATERAL) {
            return self.parse_subquery_table(start, true);
        }
        if self.at(TokenType::LPAREN) {
            return self.parse_subquery_table(start, false);
        }
        if self.at(TokenType::MACRO) {
            let raw = self.advance().text;
            let alias = self.parse_alias();
            return TableRef::Macro {
                raw,
                alias,
                span: self.span_from(start),
                comments: CommentSet::new(),
            };
        }
        if self.at(TokenType::IDENT) {
            let first = self.advance().text;
            let mut parts = vec![first];
            while self.at(TokenType::DOT) && self.peek().ty == TokenType::IDENT {
                self.advance();
                parts.push(self.advance().text);
            }
            let (catalog, schema, name) = match parts.len() {
                1 => (None, None, parts.remove(0)),
                2 => {
                    let name = parts.pop().unwrap_or_default();
                    (None, parts.pop(), name)
                }
                _ => {
                    let name = parts.pop().unwrap_or_default();
                    let schema = parts.pop();
                    (parts.pop(), schema, name)
                }
            };
            let alias = self.parse_alias();
            return TableRef::Named {
                catalog,
                schema,
                name,
                alias,
                span: self.span_from(start),
                comments: CommentSet::new(),
            };
        }
        let tok = self.cur().clone();
        self.report(Diagnostic::syntax(
            format!("expected a table reference, found {}", tok.ty),
            tok.span(),
        ));
        self.synchronize();
        TableRef::Named {
            catalog: None,
            schema: None,
            name: String::new(),
            alias: None,
            span: self.span_from(start),
            comments: CommentSet::new(),
        }
    }

    fn parse_subquery_table(&mut self, start: Position, lateral: bool) -> TableRef {
        if let Err(diagnostic) = self.expect(TokenType::LPAREN) {
            self.report(diagnostic);
        }
        let subquery = Box::new(self.parse_select_stmt());
        if let Err(diagnostic) = self.expect(TokenType::RPAREN) {
            self.report(diagnostic);
        }
        let alias = self.parse_alias();
        let span = self.span_from(start);
        if lateral {
            TableRef::Lateral {
                subquery,
                alias,
                span,
                comments: CommentSet::new(),
            }
        } else {
            TableRef::Derived {
                subquery,
                alias,
                span,
                comments: CommentSet::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::dialect::ansi;

    fn parse(src: &str) -> Parse {
        let dialect = ansi();
        Parser::new(src, &dialect).parse()
    }

    fn parse_clean(src: &str) -> Parse {
        let parse = parse(src);
        assert!(
            parse.diagnostics.is_empty(),
            "unexpected diagnostics for {src:?}: {:?}",
            parse.diagnostics
        );
        parse
    }

    #[test]
    fn test_simple_select() {
        let parse = parse_clean("SELECT id, name FROM users");
        let core = &parse.stmt.body.left;
        assert_eq!(core.items.len(), 2);
        let from = core.from.as_ref().unwrap();
        assert!(matches!(
            &from.source,
            TableRef::Named { name, .. } if name == "users"
        ));
    }

    #[test]
    fn test_table_star_item() {
        let parse = parse_clean("SELECT t.* FROM t");
        let core = &parse.stmt.body.left;
        assert!(matches!(
            &core.items[0].kind,
            SelectItemKind::TableStar { table } if table == "t"
        ));
    }

    #[test]
    fn test_catalog_folds_to_two_parts() {
        let parse = parse_clean("SELECT a.b.c FROM t");
        let core = &parse.stmt.body.left;
        let SelectItemKind::Expr { expr, .. } = &core.items[0].kind else {
            panic!("expected expression item");
        };
        assert!(matches!(
            expr,
            Expr::ColumnRef { table: Some(t), column, .. } if t == "b" && column == "c"
        ));
    }

    #[test]
    fn test_aliases() {
        let parse = parse_clean("SELECT id AS user_id, name display FROM users u");
        let core = &parse.stmt.body.left;
        let aliases: Vec<Option<&str>> = core
            .items
            .iter()
            .map(|item| match &item.kind {
                SelectItemKind::Expr { alias, .. } => alias.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(aliases, vec![Some("user_id"), Some("display")]);
        let from = core.from.as_ref().unwrap();
        assert!(matches!(
            &from.source,
            TableRef::Named { alias: Some(a), .. } if a == "u"
        ));
    }

    #[test]
    fn test_set_ops_nest_to_the_right() {
        let parse = parse_clean("SELECT a FROM x UNION ALL SELECT b FROM y UNION SELECT c FROM z");
        let body = &parse.stmt.body;
        let op = body.op.as_ref().unwrap();
        assert_eq!(op.kind, SetOpKind::Union);
        assert!(op.all);
        let right = body.right.as_ref().unwrap();
        let inner = right.op.as_ref().unwrap();
        assert_eq!(inner.kind, SetOpKind::Union);
        assert!(!inner.all);
        assert!(right.right.is_some());
    }

    #[test]
    fn test_with_clause() {
        let parse = parse_clean("WITH recent AS (SELECT id FROM events) SELECT id FROM recent");
        let with = parse.stmt.with.as_ref().unwrap();
        assert!(!with.recursive);
        assert_eq!(with.ctes.len(), 1);
        assert_eq!(with.ctes[0].name, "recent");
        assert_eq!(with.ctes[0].query.body.left.items.len(), 1);
    }

    #[test]
    fn test_join_modifier_and_using() {
        let parse = parse_clean(
            "SELECT a FROM t LEFT OUTER JOIN u ON t.id = u.id INNER JOIN v USING (id, tag)",
        );
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        assert_eq!(from.joins.len(), 2);
        assert_eq!(from.joins[0].join_type, "LEFT");
        assert!(from.joins[0].condition.is_some());
        assert_eq!(from.joins[1].join_type, "INNER");
        assert_eq!(
            from.joins[1].using_columns.as_deref(),
            Some(&[String::from("id"), String::from("tag")][..])
        );
    }

    #[test]
    fn test_cross_join_takes_no_condition() {
        let parse = parse("SELECT a FROM t CROSS JOIN u ON t.id = u.id");
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("cannot take ON"));
    }

    #[test]
    fn test_comma_join_is_implicit_cross() {
        let parse = parse_clean("SELECT a FROM t, u");
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        assert_eq!(from.joins.len(), 1);
        assert!(from.joins[0].implicit);
        assert!(from.joins[0].is_condition_free());
    }

    #[test]
    fn test_duplicate_where_keeps_later_value() {
        let parse = parse("SELECT a FROM t WHERE x = 1 WHERE y = 2");
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("duplicate WHERE"));
        let where_clause = parse.stmt.body.left.where_clause.as_ref().unwrap();
        assert!(matches!(
            where_clause,
            Expr::Binary { left, .. }
                if matches!(&**left, Expr::ColumnRef { column, .. } if column == "y")
        ));
    }

    #[test]
    fn test_trailing_input_is_diagnosed() {
        let parse = parse("SELECT a FROM t 42");
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("trailing input"));
    }

    #[test]
    fn test_recovery_keeps_later_clauses() {
        let parse = parse("SELECT a, FROM t WHERE x = 1");
        assert!(!parse.diagnostics.is_empty());
        let core = &parse.stmt.body.left;
        assert!(core.from.is_some());
        assert!(core.where_clause.is_some());
    }

    #[test]
    fn test_parse_sql_rejects_broken_input() {
        let dialect = ansi();
        let err = parse_sql("SELECT FROM", &dialect).unwrap_err();
        assert!(err.to_string().contains("expected an expression"));
    }

    #[test]
    fn test_parse_sql_accepts_clean_input() {
        let dialect = ansi();
        let parse = parse_sql("SELECT 1", &dialect).unwrap();
        assert!(parse.is_clean());
        assert_eq!(parse.stmt.body.left.items.len(), 1);
    }

    #[test]
    fn test_derived_table() {
        let parse = parse_clean("SELECT x FROM (SELECT id AS x FROM t) sub");
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        assert!(matches!(
            &from.source,
            TableRef::Derived { alias: Some(a), .. } if a == "sub"
        ));
    }

    #[test]
    fn test_semicolon_terminates() {
        let parse = parse_clean("SELECT a FROM t;");
        assert_eq!(parse.stmt.body.left.items.len(), 1);
    }

    #[test]
    fn test_clause_spans_cover_source() {
        let parse = parse_clean("SELECT a FROM t WHERE a > 1");
        let span = parse.stmt.span;
        assert_eq!(span.start.offset, 0);
        assert_eq!(span.end.offset, 27);
    }
}
