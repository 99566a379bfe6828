//! Dialect-aware pretty printing.
//!
//! Output follows one shape: the select list, grouping and ordering items
//! each get a line of their own under their clause keyword, two spaces per
//! level; inline clauses (`LIMIT`, `OFFSET`, `FETCH` under ANSI) stay on
//! one line; subqueries always open an indented block. Clause keywords
//! come from the active dialect's clause table, so a renamed or extension
//! clause prints with the dialect's own spelling. [`format_with_comments`]
//! additionally reattaches source comments by position before printing.

mod comments;
mod expr;

use crate::ast::{
    CommentSet, Cte, Expr, FromClause, Join, SelectBody, SelectCore, SelectItem, SelectItemKind,
    SelectStmt, StarModifier, TableRef, WithClause,
};
use crate::dialect::{ClauseSlot, Dialect};
use crate::lexer::{lookup_keyword, Comment};

/// Pretty-prints a statement under `dialect`.
#[must_use]
pub fn format(stmt: &SelectStmt, dialect: &Dialect) -> String {
    let mut writer = SqlWriter::new(dialect);
    writer.print_stmt(stmt);
    writer.finish()
}

/// Pretty-prints a statement with the comments collected during its
/// parse reattached: each comment goes back next to the node whose
/// position it decorated in the source.
#[must_use]
pub fn format_with_comments(stmt: &SelectStmt, comments: &[Comment], dialect: &Dialect) -> String {
    if comments.is_empty() {
        return format(stmt, dialect);
    }
    let mut decorated = stmt.clone();
    comments::decorate(&mut decorated, comments);
    format(&decorated, dialect)
}

const INDENT: &str = "  ";

/// Line-oriented output builder; tracks indentation and whether the
/// current line has content yet.
struct SqlWriter<'d> {
    dialect: &'d Dialect,
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl<'d> SqlWriter<'d> {
    fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    fn finish(mut self) -> String {
        if !self.at_line_start {
            self.out.push('\n');
        }
        self.out
    }

    fn push(&mut self, text: &str) {
        if self.at_line_start {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Prints leading comments, each on its own line. Only meaningful at
    /// a line start; decoration never targets mid-line positions.
    fn leading(&mut self, comments: &CommentSet) {
        for comment in &comments.leading {
            self.push(&comment.text);
            self.newline();
        }
    }

    /// Appends trailing comments to the current line.
    fn trailing(&mut self, comments: &CommentSet) {
        for comment in &comments.trailing {
            self.push(" ");
            self.push(&comment.text);
        }
    }

    fn display_for(&self, slot: ClauseSlot, default: &str) -> String {
        self.dialect
            .clause_for_slot(slot)
            .map_or_else(|| String::from(default), |def| def.display.clone())
    }

    fn is_inline(&self, slot: ClauseSlot) -> bool {
        self.dialect
            .clause_for_slot(slot)
            .is_some_and(|def| def.inline)
    }

    /// Quotes `ident` when printing it bare would change how it lexes:
    /// empty, non-word characters, or a collision with any registered
    /// keyword or the dialect's reserved words.
    fn print_ident(&mut self, ident: &str) {
        if needs_quotes(self.dialect, ident) {
            let quoted = self.dialect.quote_ident(ident);
            self.push(&quoted);
        } else {
            self.push(ident);
        }
    }

    // ---- statements ---------------------------------------------------

    fn print_stmt(&mut self, stmt: &SelectStmt) {
        self.leading(&stmt.comments);
        if let Some(with) = &stmt.with {
            self.print_with(with);
        }
        self.print_body(&stmt.body);
        for comment in &stmt.comments.trailing {
            self.push(&comment.text);
            self.newline();
        }
    }

    fn print_with(&mut self, with: &WithClause) {
        self.leading(&with.comments);
        self.push(if with.recursive { "WITH RECURSIVE " } else { "WITH " });
        let last = with.ctes.len().saturating_sub(1);
        for (i, cte) in with.ctes.iter().enumerate() {
            self.print_cte(cte, i < last);
        }
    }

    fn print_cte(&mut self, cte: &Cte, more: bool) {
        self.leading(&cte.comments);
        self.print_ident(&cte.name);
        self.push(" AS (");
        self.newline();
        self.indent += 1;
        self.print_stmt(&cte.query);
        self.indent -= 1;
        self.push(")");
        if more {
            self.push(",");
        }
        self.trailing(&cte.comments);
        self.newline();
    }

    fn print_body(&mut self, body: &SelectBody) {
        self.leading(&body.comments);
        self.print_core(&body.left);
        if let (Some(op), Some(right)) = (&body.op, &body.right) {
            self.push(op.kind.keyword());
            if op.all {
                self.push(" ALL");
            }
            if op.by_name {
                self.push(" BY NAME");
            }
            self.newline();
            self.print_body(right);
        }
    }

    fn print_core(&mut self, core: &SelectCore) {
        self.leading(&core.comments);
        self.push("SELECT");
        if core.distinct {
            self.push(" DISTINCT");
        }
        self.newline();

        self.indent += 1;
        let last = core.items.len().saturating_sub(1);
        for (i, item) in core.items.iter().enumerate() {
            self.leading(&item.comments);
            self.print_select_item(item);
            if i < last {
                self.push(",");
            }
            self.trailing(&item.comments);
            self.newline();
        }
        self.indent -= 1;

        if let Some(from) = &core.from {
            self.print_from(from);
        }
        if let Some(expr) = &core.where_clause {
            self.print_expr_slot(ClauseSlot::Where, "WHERE", expr);
        }
        self.print_group_by(core);
        if let Some(expr) = &core.having {
            self.print_expr_slot(ClauseSlot::Having, "HAVING", expr);
        }
        self.print_windows(core);
        if let Some(expr) = &core.qualify {
            self.print_expr_slot(ClauseSlot::Qualify, "QUALIFY", expr);
        }
        self.print_order_by(core);
        if let Some(expr) = &core.limit {
            self.print_expr_slot(ClauseSlot::Limit, "LIMIT", expr);
        }
        if let Some(expr) = &core.offset {
            self.print_expr_slot(ClauseSlot::Offset, "OFFSET", expr);
        }
        if let Some(expr) = &core.fetch {
            let display = self.display_for(ClauseSlot::Fetch, "FETCH");
            self.push(&display);
            self.push(" FIRST ");
            self.print_expr(expr);
            self.push(" ROWS ONLY");
            self.newline();
        }
        for ext in &core.extensions {
            self.push(&ext.keyword);
            for (i, expr) in ext.exprs.iter().enumerate() {
                self.push(if i == 0 { " " } else { ", " });
                self.print_expr(expr);
            }
            self.newline();
        }
    }

    /// A clause holding one expression: on its keyword line when marked
    /// inline, otherwise as an indented block that breaks complex boolean
    /// chains before each operator.
    fn print_expr_slot(&mut self, slot: ClauseSlot, default: &str, expr: &Expr) {
        let display = self.display_for(slot, default);
        self.push(&display);
        if self.is_inline(slot) {
            self.push(" ");
            self.print_expr(expr);
            self.newline();
            return;
        }
        self.newline();
        self.indent += 1;
        self.print_condition(expr);
        self.newline();
        self.indent -= 1;
    }

    fn print_group_by(&mut self, core: &SelectCore) {
        if core.group_by_all {
            let display = self.display_for(ClauseSlot::GroupBy, "GROUP BY");
            self.push(&display);
            self.push(" ALL");
            self.newline();
            return;
        }
        if core.group_by.is_empty() {
            return;
        }
        let display = self.display_for(ClauseSlot::GroupBy, "GROUP BY");
        self.push(&display);
        self.newline();
        self.indent += 1;
        let last = core.group_by.len() - 1;
        for (i, expr) in core.group_by.iter().enumerate() {
            self.print_expr(expr);
            if i < last {
                self.push(",");
            }
            self.newline();
        }
        self.indent -= 1;
    }

    fn print_windows(&mut self, core: &SelectCore) {
        if core.windows.is_empty() {
            return;
        }
        let display = self.display_for(ClauseSlot::Window, "WINDOW");
        self.push(&display);
        self.newline();
        self.indent += 1;
        let last = core.windows.len() - 1;
        for (i, def) in core.windows.iter().enumerate() {
            self.print_ident(&def.name);
            self.push(" AS ");
            self.print_window_parens(&def.spec);
            if i < last {
                self.push(",");
            }
            self.newline();
        }
        self.indent -= 1;
    }

    fn print_order_by(&mut self, core: &SelectCore) {
        if core.order_by_all {
            let display = self.display_for(ClauseSlot::OrderBy, "ORDER BY");
            self.push(&display);
            self.push(" ALL");
            if core.order_by_all_desc {
                self.push(" DESC");
            }
            self.newline();
            return;
        }
        if core.order_by.is_empty() {
            return;
        }
        let display = self.display_for(ClauseSlot::OrderBy, "ORDER BY");
        self.push(&display);
        self.newline();
        self.indent += 1;
        let last = core.order_by.len() - 1;
        for (i, item) in core.order_by.iter().enumerate() {
            self.print_order_item(item);
            if i < last {
                self.push(",");
            }
            self.newline();
        }
        self.indent -= 1;
    }

    // ---- FROM ---------------------------------------------------------

    fn print_from(&mut self, from: &FromClause) {
        self.leading(&from.comments);
        self.push("FROM ");
        self.print_table_ref(&from.source);
        for join in &from.joins {
            if join.implicit {
                self.push(", ");
                self.print_table_ref(&join.right);
                continue;
            }
            self.newline();
            self.print_join(join);
        }
        self.trailing(&from.comments);
        self.newline();
    }

    fn print_join(&mut self, join: &Join) {
        self.leading(&join.comments);
        if join.natural {
            self.push("NATURAL ");
        }
        if !(join.natural && join.join_type == "INNER") {
            self.push(&join.join_type);
            self.push(" ");
        }
        self.push("JOIN ");
        self.print_table_ref(&join.right);
        if let Some(condition) = &join.condition {
            self.push(" ON ");
            self.print_expr(condition);
        } else if let Some(columns) = &join.using_columns {
            self.push(" USING (");
            let last = columns.len().saturating_sub(1);
            for (i, column) in columns.iter().enumerate() {
                self.print_ident(column);
                if i < last {
                    self.push(", ");
                }
            }
            self.push(")");
        }
        self.trailing(&join.comments);
    }

    fn print_table_ref(&mut self, table: &TableRef) {
        match table {
            TableRef::Named {
                catalog,
                schema,
                name,
                alias,
                ..
            } => {
                if let Some(catalog) = catalog {
                    self.print_ident(catalog);
                    self.push(".");
                }
                if let Some(schema) = schema {
                    self.print_ident(schema);
                    self.push(".");
                }
                self.print_ident(name);
                self.print_opt_alias(alias.as_deref());
            }
            TableRef::Derived { subquery, alias, .. } => {
                self.print_subquery_block(subquery);
                self.print_opt_alias(alias.as_deref());
            }
            TableRef::Lateral { subquery, alias, .. } => {
                self.push("LATERAL ");
                self.print_subquery_block(subquery);
                self.print_opt_alias(alias.as_deref());
            }
            TableRef::Macro { raw, alias, .. } => {
                self.push(raw);
                self.print_opt_alias(alias.as_deref());
            }
            TableRef::Pivot {
                source,
                aggregates,
                for_column,
                in_values,
                in_star,
                alias,
                ..
            } => {
                self.print_table_ref(source);
                self.push(" PIVOT (");
                let last = aggregates.len().saturating_sub(1);
                for (i, agg) in aggregates.iter().enumerate() {
                    self.print_expr(agg);
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push(" FOR ");
                self.print_ident(for_column);
                self.push(" IN (");
                if *in_star {
                    self.push("*");
                } else {
                    let last = in_values.len().saturating_sub(1);
                    for (i, value) in in_values.iter().enumerate() {
                        self.print_expr(value);
                        if i < last {
                            self.push(", ");
                        }
                    }
                }
                self.push("))");
                self.print_opt_alias(alias.as_deref());
            }
            TableRef::Unpivot {
                source,
                value_columns,
                name_column,
                in_groups,
                alias,
                ..
            } => {
                self.print_table_ref(source);
                self.push(" UNPIVOT (");
                self.print_column_group(value_columns);
                self.push(" FOR ");
                self.print_ident(name_column);
                self.push(" IN (");
                let last = in_groups.len().saturating_sub(1);
                for (i, group) in in_groups.iter().enumerate() {
                    self.print_column_group(&group.columns);
                    if let Some(alias) = &group.alias {
                        self.push(" AS ");
                        self.print_ident(alias);
                    }
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push("))");
                self.print_opt_alias(alias.as_deref());
            }
        }
    }

    /// One column bare, several as a parenthesized list.
    fn print_column_group(&mut self, columns: &[String]) {
        if let [single] = columns {
            self.print_ident(single);
            return;
        }
        self.push("(");
        let last = columns.len().saturating_sub(1);
        for (i, column) in columns.iter().enumerate() {
            self.print_ident(column);
            if i < last {
                self.push(", ");
            }
        }
        self.push(")");
    }

    fn print_opt_alias(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.push(" AS ");
            self.print_ident(alias);
        }
    }

    fn print_subquery_block(&mut self, stmt: &SelectStmt) {
        self.push("(");
        self.newline();
        self.indent += 1;
        self.print_stmt(stmt);
        self.indent -= 1;
        self.push(")");
    }

    // ---- select items -------------------------------------------------

    fn print_select_item(&mut self, item: &SelectItem) {
        match &item.kind {
            SelectItemKind::Star => self.push("*"),
            SelectItemKind::TableStar { table } => {
                self.print_ident(table);
                self.push(".*");
            }
            SelectItemKind::Expr { expr, alias } => {
                self.print_expr(expr);
                self.print_opt_alias(alias.as_deref());
            }
        }
        for modifier in &item.modifiers {
            self.print_star_modifier(modifier);
        }
    }

    fn print_star_modifier(&mut self, modifier: &StarModifier) {
        match modifier {
            StarModifier::Exclude { columns, .. } => {
                self.push(" EXCLUDE (");
                let last = columns.len().saturating_sub(1);
                for (i, column) in columns.iter().enumerate() {
                    self.print_ident(column);
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push(")");
            }
            StarModifier::Replace { items, .. } => {
                self.push(" REPLACE (");
                let last = items.len().saturating_sub(1);
                for (i, item) in items.iter().enumerate() {
                    self.print_expr(&item.expr);
                    self.push(" AS ");
                    self.print_ident(&item.alias);
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push(")");
            }
            StarModifier::Rename { items, .. } => {
                self.push(" RENAME (");
                let last = items.len().saturating_sub(1);
                for (i, item) in items.iter().enumerate() {
                    self.print_ident(&item.from);
                    self.push(" AS ");
                    self.print_ident(&item.to);
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push(")");
            }
        }
    }
}

/// Returns true if `ident` cannot be printed bare: it would lex as
/// something other than a plain identifier, or it collides with a
/// registered keyword or a reserved word of the dialect.
fn needs_quotes(dialect: &Dialect, ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return true;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return true;
    }
    if lookup_keyword(ident).is_some() {
        return true;
    }
    dialect
        .config()
        .reserved_words
        .iter()
        .any(|w| w.eq_ignore_ascii_case(ident))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ansi;
    use crate::parser::Parser;

    fn fmt(src: &str) -> String {
        let dialect = ansi();
        let parse = Parser::new(src, &dialect).parse();
        assert!(
            parse.diagnostics.is_empty(),
            "diagnostics for {src:?}: {:?}",
            parse.diagnostics
        );
        format(&parse.stmt, &dialect)
    }

    #[test]
    fn test_reference_shape() {
        let out = fmt("SELECT id, SUM(val) FROM my_table WHERE active = true");
        assert_eq!(
            out,
            "SELECT\n  id,\n  SUM(val)\nFROM my_table\nWHERE\n  active = TRUE\n"
        );
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        let dialect = ansi();
        let once = fmt("SELECT a, b FROM t WHERE a > 1 ORDER BY b DESC LIMIT 10");
        let again = format(&Parser::new(&once, &dialect).parse().stmt, &dialect);
        assert_eq!(once, again);
    }

    #[test]
    fn test_inline_clauses_stay_on_one_line() {
        let out = fmt("SELECT a FROM t LIMIT 10 OFFSET 5");
        assert!(out.contains("LIMIT 10\n"));
        assert!(out.contains("OFFSET 5\n"));
    }

    #[test]
    fn test_fetch_prints_full_form() {
        let out = fmt("SELECT a FROM t FETCH FIRST ROWS ONLY");
        assert!(out.ends_with("FETCH FIRST 1 ROWS ONLY\n"));
    }

    #[test]
    fn test_keyword_identifier_is_quoted() {
        let out = fmt("SELECT \"select\" FROM t");
        assert!(out.contains("\"select\""));
    }

    #[test]
    fn test_joins_print_one_per_line() {
        let out = fmt("SELECT a FROM t LEFT OUTER JOIN u ON t.id = u.id CROSS JOIN v");
        assert!(out.contains("\nLEFT JOIN u ON t.id = u.id\n"));
        assert!(out.contains("\nCROSS JOIN v\n"));
    }

    #[test]
    fn test_derived_table_block() {
        let out = fmt("SELECT x FROM (SELECT id AS x FROM t) sub");
        assert_eq!(
            out,
            "SELECT\n  x\nFROM (\n  SELECT\n    id AS x\n  FROM t\n) AS sub\n"
        );
    }

    #[test]
    fn test_set_op_layout() {
        let out = fmt("SELECT a FROM x UNION ALL SELECT b FROM y");
        assert_eq!(
            out,
            "SELECT\n  a\nFROM x\nUNION ALL\nSELECT\n  b\nFROM y\n"
        );
    }

    #[test]
    fn test_with_layout() {
        let out = fmt("WITH recent AS (SELECT id FROM events) SELECT id FROM recent");
        assert_eq!(
            out,
            "WITH recent AS (\n  SELECT\n    id\n  FROM events\n)\nSELECT\n  id\nFROM recent\n"
        );
    }

    #[test]
    fn test_complex_where_breaks_before_operators() {
        let out = fmt(
            "SELECT a FROM t WHERE size > 10 AND weight < 5 AND color = 'red' OR shape = 'round'",
        );
        assert!(out.contains("WHERE\n  size > 10\n  AND weight < 5\n  AND color = 'red'\n  OR shape = 'round'\n"));
    }

    #[test]
    fn test_simple_where_stays_on_one_line() {
        let out = fmt("SELECT a FROM t WHERE a = 1 AND b = 2");
        assert!(out.contains("WHERE\n  a = 1 AND b = 2\n"));
    }

    #[test]
    fn test_group_and_order_items_get_lines() {
        let out = fmt("SELECT a, b FROM t GROUP BY a, b ORDER BY a ASC, b DESC NULLS LAST");
        assert!(out.contains("GROUP BY\n  a,\n  b\n"));
        assert!(out.contains("ORDER BY\n  a ASC,\n  b DESC NULLS LAST\n"));
    }

    #[test]
    fn test_comma_join_prints_inline() {
        let out = fmt("SELECT a FROM t, u");
        assert!(out.contains("FROM t, u\n"));
    }

    #[test]
    fn test_window_clause_layout() {
        let out = fmt("SELECT RANK() OVER w FROM t WINDOW w AS (PARTITION BY a ORDER BY b)");
        assert!(out.contains("WINDOW\n  w AS (PARTITION BY a ORDER BY b)\n"));
    }

    #[test]
    fn test_exists_subquery_block() {
        let out = fmt("SELECT a FROM t WHERE EXISTS (SELECT 1 FROM u)");
        assert!(out.contains("EXISTS (\n    SELECT\n      1\n    FROM u\n  )"));
    }
}
