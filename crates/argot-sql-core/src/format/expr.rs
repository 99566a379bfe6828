//! Expression rendering.
//!
//! Expressions print on one line except for subqueries, which always open
//! an indented block, and clause-level boolean chains, which break before
//! each `AND`/`OR` once the expression grows past a size threshold.

use crate::ast::{Expr, FrameBound, FrameSpec, InSet, LiteralKind, OrderByItem, WindowSpec};
use crate::lexer::TokenType;

use super::SqlWriter;

/// Node-count bound above which a clause condition switches from a single
/// line to one boolean operand per line.
const COMPLEX_THRESHOLD: usize = 10;

impl SqlWriter<'_> {
    pub(super) fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::ColumnRef { table, column, .. } => {
                if let Some(table) = table {
                    self.print_ident(table);
                    self.push(".");
                }
                self.print_ident(column);
            }
            Expr::Literal { kind, text, .. } => match kind {
                LiteralKind::Bool => {
                    let upper = text.to_ascii_uppercase();
                    self.push(&upper);
                }
                LiteralKind::Null => self.push("NULL"),
                LiteralKind::Number | LiteralKind::String => self.push(text),
            },
            Expr::Binary { left, op, right, .. } => {
                if *op == TokenType::COMMA {
                    self.print_comma_chain(expr);
                    return;
                }
                self.print_expr(left);
                self.push(" ");
                self.push(&op.name());
                self.push(" ");
                self.print_expr(right);
            }
            Expr::Unary { op, operand, .. } => {
                let name = op.name();
                self.push(&name);
                if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    self.push(" ");
                }
                self.print_expr(operand);
            }
            Expr::FuncCall {
                name,
                distinct,
                star,
                args,
                filter,
                window,
                ..
            } => {
                self.push(name);
                self.push("(");
                if *distinct {
                    self.push("DISTINCT ");
                }
                if *star {
                    self.push("*");
                } else {
                    self.print_expr_list(args);
                }
                self.push(")");
                if let Some(filter) = filter {
                    self.push(" FILTER (WHERE ");
                    self.print_expr(filter);
                    self.push(")");
                }
                if let Some(window) = window {
                    self.push(" OVER ");
                    self.print_over(window);
                }
            }
            Expr::Case {
                operand,
                whens,
                else_expr,
                ..
            } => {
                self.push("CASE");
                if let Some(operand) = operand {
                    self.push(" ");
                    self.print_expr(operand);
                }
                for when in whens {
                    self.push(" WHEN ");
                    self.print_expr(&when.condition);
                    self.push(" THEN ");
                    self.print_expr(&when.result);
                }
                if let Some(else_expr) = else_expr {
                    self.push(" ELSE ");
                    self.print_expr(else_expr);
                }
                self.push(" END");
            }
            Expr::Cast { expr, type_name, .. } => {
                self.push("CAST(");
                self.print_expr(expr);
                self.push(" AS ");
                self.push(type_name);
                self.push(")");
            }
            Expr::In { expr, not, set, .. } => {
                self.print_expr(expr);
                self.push(if *not { " NOT IN " } else { " IN " });
                match set {
                    InSet::Values(values) => {
                        self.push("(");
                        self.print_expr_list(values);
                        self.push(")");
                    }
                    InSet::Subquery(stmt) => self.print_subquery_block(stmt),
                }
            }
            Expr::Between {
                expr,
                not,
                low,
                high,
                ..
            } => {
                self.print_expr(expr);
                self.push(if *not { " NOT BETWEEN " } else { " BETWEEN " });
                self.print_expr(low);
                self.push(" AND ");
                self.print_expr(high);
            }
            Expr::IsNull { expr, not, .. } => {
                self.print_expr(expr);
                self.push(if *not { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::IsBool {
                expr, not, value, ..
            } => {
                self.print_expr(expr);
                self.push(if *not { " IS NOT " } else { " IS " });
                self.push(if *value { "TRUE" } else { "FALSE" });
            }
            Expr::Like {
                expr,
                not,
                op,
                pattern,
                ..
            } => {
                self.print_expr(expr);
                self.push(" ");
                if *not {
                    self.push("NOT ");
                }
                self.push(&op.name());
                self.push(" ");
                self.print_expr(pattern);
            }
            Expr::Paren { inner, .. } => {
                self.push("(");
                self.print_comma_chain(inner);
                self.push(")");
            }
            Expr::Star { table, .. } => {
                if let Some(table) = table {
                    self.print_ident(table);
                    self.push(".");
                }
                self.push("*");
            }
            Expr::Subquery { stmt, .. } => self.print_subquery_block(stmt),
            Expr::Exists { not, stmt, .. } => {
                if *not {
                    self.push("NOT ");
                }
                self.push("EXISTS ");
                self.print_subquery_block(stmt);
            }
            Expr::Macro { raw, .. } | Expr::Placeholder { text: raw, .. } => self.push(raw),
            Expr::Lambda { params, body, .. } => {
                if let [single] = params.as_slice() {
                    self.print_ident(single);
                } else {
                    self.push("(");
                    let last = params.len().saturating_sub(1);
                    for (i, param) in params.iter().enumerate() {
                        self.print_ident(param);
                        if i < last {
                            self.push(", ");
                        }
                    }
                    self.push(")");
                }
                self.push(" -> ");
                self.print_expr(body);
            }
            Expr::Struct { fields, .. } => {
                self.push("{");
                let last = fields.len().saturating_sub(1);
                for (i, field) in fields.iter().enumerate() {
                    self.push("'");
                    self.push(&field.name);
                    self.push("': ");
                    self.print_expr(&field.value);
                    if i < last {
                        self.push(", ");
                    }
                }
                self.push("}");
            }
            Expr::List { elements, .. } => {
                self.push("[");
                self.print_expr_list(elements);
                self.push("]");
            }
            Expr::Index { target, op, .. } => {
                self.print_expr(target);
                self.push("[");
                match op {
                    crate::ast::IndexOp::Element(index) => self.print_expr(index),
                    crate::ast::IndexOp::Slice { start, stop } => {
                        if let Some(start) = start {
                            self.print_expr(start);
                        }
                        self.push(":");
                        if let Some(stop) = stop {
                            self.print_expr(stop);
                        }
                    }
                }
                self.push("]");
            }
        }
    }

    fn print_expr_list(&mut self, exprs: &[Expr]) {
        let last = exprs.len().saturating_sub(1);
        for (i, expr) in exprs.iter().enumerate() {
            self.print_expr(expr);
            if i < last {
                self.push(", ");
            }
        }
    }

    /// Prints a right-nested comma chain flat: `a, b, c`.
    fn print_comma_chain(&mut self, expr: &Expr) {
        if let Expr::Binary {
            left,
            op: TokenType::COMMA,
            right,
            ..
        } = expr
        {
            self.print_expr(left);
            self.push(", ");
            self.print_comma_chain(right);
            return;
        }
        self.print_expr(expr);
    }

    /// A clause-level condition: single line while small, one boolean
    /// operand per line (operator leading) once past the threshold.
    pub(super) fn print_condition(&mut self, expr: &Expr) {
        if complexity(expr) < COMPLEX_THRESHOLD {
            self.print_expr(expr);
            return;
        }
        let mut parts = Vec::new();
        flatten_bool(expr, None, &mut parts);
        if parts.len() == 1 {
            self.print_expr(expr);
            return;
        }
        let last = parts.len() - 1;
        for (i, (word, part)) in parts.iter().enumerate() {
            if let Some(word) = word {
                self.push(word);
                self.push(" ");
            }
            self.print_expr(part);
            if i < last {
                self.newline();
            }
        }
    }

    pub(super) fn print_order_item(&mut self, item: &OrderByItem) {
        self.print_expr(&item.expr);
        match item.asc {
            Some(true) => self.push(" ASC"),
            Some(false) => self.push(" DESC"),
            None => {}
        }
        match item.nulls_first {
            Some(true) => self.push(" NULLS FIRST"),
            Some(false) => self.push(" NULLS LAST"),
            None => {}
        }
    }

    /// The spec after `OVER`: a bare window name when that is all there
    /// is, otherwise the parenthesized form.
    fn print_over(&mut self, spec: &WindowSpec) {
        let bare = spec.name.is_some()
            && spec.partition_by.is_empty()
            && spec.order_by.is_empty()
            && spec.frame.is_none();
        if bare {
            if let Some(name) = &spec.name {
                self.print_ident(name);
            }
            return;
        }
        self.print_window_parens(spec);
    }

    pub(super) fn print_window_parens(&mut self, spec: &WindowSpec) {
        self.push("(");
        let mut separate = false;
        if let Some(name) = &spec.name {
            self.print_ident(name);
            separate = true;
        }
        if !spec.partition_by.is_empty() {
            if separate {
                self.push(" ");
            }
            self.push("PARTITION BY ");
            self.print_expr_list(&spec.partition_by);
            separate = true;
        }
        if !spec.order_by.is_empty() {
            if separate {
                self.push(" ");
            }
            self.push("ORDER BY ");
            let last = spec.order_by.len() - 1;
            for (i, item) in spec.order_by.iter().enumerate() {
                self.print_order_item(item);
                if i < last {
                    self.push(", ");
                }
            }
            separate = true;
        }
        if let Some(frame) = &spec.frame {
            if separate {
                self.push(" ");
            }
            self.print_frame(frame);
        }
        self.push(")");
    }

    fn print_frame(&mut self, frame: &FrameSpec) {
        self.push(frame.kind.keyword());
        self.push(" ");
        if let Some(end) = &frame.end {
            self.push("BETWEEN ");
            self.print_frame_bound(&frame.start);
            self.push(" AND ");
            self.print_frame_bound(end);
        } else {
            self.print_frame_bound(&frame.start);
        }
    }

    fn print_frame_bound(&mut self, bound: &FrameBound) {
        match bound {
            FrameBound::UnboundedPreceding => self.push("UNBOUNDED PRECEDING"),
            FrameBound::UnboundedFollowing => self.push("UNBOUNDED FOLLOWING"),
            FrameBound::CurrentRow => self.push("CURRENT ROW"),
            FrameBound::Preceding(expr) => {
                self.print_expr(expr);
                self.push(" PRECEDING");
            }
            FrameBound::Following(expr) => {
                self.print_expr(expr);
                self.push(" FOLLOWING");
            }
        }
    }
}

/// Splits a boolean chain into printable segments, each tagged with the
/// operator word that precedes it (`None` for the first).
fn flatten_bool<'e>(
    expr: &'e Expr,
    pending: Option<&'static str>,
    out: &mut Vec<(Option<&'static str>, &'e Expr)>,
) {
    if let Expr::Binary {
        left, op, right, ..
    } = expr
    {
        let word = match *op {
            TokenType::AND => Some("AND"),
            TokenType::OR => Some("OR"),
            _ => None,
        };
        if let Some(word) = word {
            flatten_bool(left, pending, out);
            flatten_bool(right, Some(word), out);
            return;
        }
    }
    out.push((pending, expr));
}

/// A rough node count used to decide when a condition is too big for one
/// line. Subqueries always count as past the threshold.
fn complexity(expr: &Expr) -> usize {
    match expr {
        Expr::ColumnRef { .. }
        | Expr::Literal { .. }
        | Expr::Star { .. }
        | Expr::Macro { .. }
        | Expr::Placeholder { .. } => 1,
        Expr::Binary { left, right, .. } => 1 + complexity(left) + complexity(right),
        Expr::Unary { operand: e, .. }
        | Expr::Paren { inner: e, .. }
        | Expr::Cast { expr: e, .. }
        | Expr::IsNull { expr: e, .. }
        | Expr::IsBool { expr: e, .. }
        | Expr::Lambda { body: e, .. }
        | Expr::Index { target: e, .. } => 1 + complexity(e),
        Expr::Like { expr, pattern, .. } => 1 + complexity(expr) + complexity(pattern),
        Expr::Between {
            expr, low, high, ..
        } => 1 + complexity(expr) + complexity(low) + complexity(high),
        Expr::In { expr, set, .. } => match set {
            InSet::Values(values) => {
                2 + complexity(expr) + values.iter().map(complexity).sum::<usize>()
            }
            InSet::Subquery(_) => COMPLEX_THRESHOLD,
        },
        Expr::FuncCall { args, .. } => 2 + args.iter().map(complexity).sum::<usize>(),
        Expr::Case { whens, .. } => 2 + 2 * whens.len(),
        Expr::Struct { fields, .. } => 1 + fields.len(),
        Expr::List { elements, .. } => 1 + elements.len(),
        Expr::Subquery { .. } | Expr::Exists { .. } => COMPLEX_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ansi;
    use crate::parser::Parser;

    fn expr_line(src: &str) -> String {
        let dialect = ansi();
        let sql = format!("SELECT {src} FROM t");
        let parse = Parser::new(&sql, &dialect).parse();
        assert!(
            parse.diagnostics.is_empty(),
            "diagnostics for {src:?}: {:?}",
            parse.diagnostics
        );
        let out = super::super::format(&parse.stmt, &dialect);
        out.lines()
            .nth(1)
            .unwrap_or_default()
            .trim_start()
            .to_string()
    }

    #[test]
    fn test_operators_print_with_spaces() {
        assert_eq!(expr_line("a+b*2"), "a + b * 2");
        assert_eq!(expr_line("a||'x'"), "a || 'x'");
    }

    #[test]
    fn test_unary_keeps_sign_tight() {
        assert_eq!(expr_line("-x"), "-x");
        assert_eq!(expr_line("NOT x"), "NOT x");
    }

    #[test]
    fn test_bool_literals_uppercase() {
        assert_eq!(expr_line("TRUE"), "TRUE");
        assert_eq!(expr_line("false"), "FALSE");
        assert_eq!(expr_line("null"), "NULL");
    }

    #[test]
    fn test_case_prints_inline() {
        assert_eq!(
            expr_line("CASE WHEN a > 1 THEN 'big' ELSE 'small' END"),
            "CASE WHEN a > 1 THEN 'big' ELSE 'small' END"
        );
    }

    #[test]
    fn test_cast_and_predicates() {
        assert_eq!(expr_line("CAST(a AS INTEGER)"), "CAST(a AS INTEGER)");
        assert_eq!(expr_line("a IS NOT NULL"), "a IS NOT NULL");
        assert_eq!(expr_line("a NOT IN (1, 2)"), "a NOT IN (1, 2)");
        assert_eq!(
            expr_line("a BETWEEN 1 AND 10"),
            "a BETWEEN 1 AND 10"
        );
        assert_eq!(expr_line("a NOT LIKE 'x%'"), "a NOT LIKE 'x%'");
    }

    #[test]
    fn test_function_with_filter_and_window() {
        assert_eq!(
            expr_line("COUNT(*) FILTER (WHERE a > 0)"),
            "COUNT(*) FILTER (WHERE a > 0)"
        );
        assert_eq!(
            expr_line("SUM(x) OVER (PARTITION BY g ORDER BY ts DESC)"),
            "SUM(x) OVER (PARTITION BY g ORDER BY ts DESC)"
        );
    }

    #[test]
    fn test_window_frame_round_trips() {
        assert_eq!(
            expr_line("SUM(x) OVER (ORDER BY ts ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)"),
            "SUM(x) OVER (ORDER BY ts ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)"
        );
        assert_eq!(
            expr_line("SUM(x) OVER (ROWS UNBOUNDED PRECEDING)"),
            "SUM(x) OVER (ROWS UNBOUNDED PRECEDING)"
        );
    }

    #[test]
    fn test_named_window_reference_stays_bare() {
        assert_eq!(expr_line("RANK() OVER w"), "RANK() OVER w");
    }

    #[test]
    fn test_paren_chain_prints_flat() {
        assert_eq!(expr_line("(a, b, c)"), "(a, b, c)");
    }

    #[test]
    fn test_complexity_counts_leaves() {
        let dialect = ansi();
        let parse = Parser::new("SELECT a FROM t WHERE a = 1", &dialect).parse();
        let expr = parse.stmt.body.left.where_clause.as_ref();
        let expr = expr.unwrap_or_else(|| panic!("where clause missing"));
        assert_eq!(complexity(expr), 3);
    }

    #[test]
    fn test_macro_prints_verbatim() {
        assert_eq!(expr_line("{{ ref('users') }}"), "{{ ref('users') }}");
    }
}
