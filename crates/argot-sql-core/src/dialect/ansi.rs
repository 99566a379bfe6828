//! The ANSI base dialect.
//!
//! Standard operators, the INNER/LEFT/RIGHT/FULL/CROSS join families, and
//! the classic clause tail (`WHERE` through `FETCH`). Vendor dialects are
//! built by inheriting this one and layering their own tables on top.

use std::sync::{Arc, OnceLock};

use crate::ast::{Expr, LiteralKind};
use crate::lexer::{Span, TokenType};
use crate::parser::{ClauseCtx, Diagnostic};

use super::def::{ClauseSlot, ClauseValue, JoinDef, Precedence};
use super::{Dialect, DialectBuilder, DialectConfig, IdentNormalization};

/// Returns the shared ANSI dialect, built once per process.
pub fn ansi() -> Arc<Dialect> {
    static ANSI: OnceLock<Arc<Dialect>> = OnceLock::new();
    Arc::clone(ANSI.get_or_init(|| Arc::new(build())))
}

fn build() -> Dialect {
    DialectBuilder::new(config())
        .operator(TokenType::EQ, Precedence::Comparison)
        .operator(TokenType::NEQ, Precedence::Comparison)
        .operator(TokenType::LT, Precedence::Comparison)
        .operator(TokenType::LTE, Precedence::Comparison)
        .operator(TokenType::GT, Precedence::Comparison)
        .operator(TokenType::GTE, Precedence::Comparison)
        .operator(TokenType::PLUS, Precedence::Addition)
        .operator(TokenType::MINUS, Precedence::Addition)
        .operator(TokenType::CONCAT, Precedence::Addition)
        .operator(TokenType::ASTERISK, Precedence::Multiply)
        .operator(TokenType::SLASH, Precedence::Multiply)
        .operator(TokenType::PERCENT, Precedence::Multiply)
        .like_operator(TokenType::LIKE)
        .join(TokenType::INNER, JoinDef::conditioned("INNER"))
        .join(
            TokenType::LEFT,
            JoinDef::conditioned("LEFT").with_modifier(TokenType::OUTER),
        )
        .join(
            TokenType::RIGHT,
            JoinDef::conditioned("RIGHT").with_modifier(TokenType::OUTER),
        )
        .join(
            TokenType::FULL,
            JoinDef::conditioned("FULL").with_modifier(TokenType::OUTER),
        )
        .join(TokenType::CROSS, JoinDef::condition_free("CROSS"))
        .clause(TokenType::WHERE, "WHERE", ClauseSlot::Where, false, expr_clause)
        .clause(
            TokenType::GROUP,
            "GROUP BY",
            ClauseSlot::GroupBy,
            false,
            group_by_clause,
        )
        .clause(
            TokenType::HAVING,
            "HAVING",
            ClauseSlot::Having,
            false,
            expr_clause,
        )
        .clause(
            TokenType::WINDOW,
            "WINDOW",
            ClauseSlot::Window,
            false,
            window_clause,
        )
        .clause(
            TokenType::ORDER,
            "ORDER BY",
            ClauseSlot::OrderBy,
            false,
            order_by_clause,
        )
        .clause(TokenType::LIMIT, "LIMIT", ClauseSlot::Limit, true, expr_clause)
        .clause(
            TokenType::OFFSET,
            "OFFSET",
            ClauseSlot::Offset,
            true,
            offset_clause,
        )
        .clause(TokenType::FETCH, "FETCH", ClauseSlot::Fetch, true, fetch_clause)
        .build()
}

fn config() -> DialectConfig {
    let mut config = DialectConfig::named("ansi");
    config.quoting.normalization = IdentNormalization::Upper;
    config.functions.aggregate = words(&[
        "COUNT", "SUM", "AVG", "MIN", "MAX", "EVERY", "ANY_VALUE", "STDDEV_POP", "STDDEV_SAMP",
        "VAR_POP", "VAR_SAMP",
    ]);
    config.functions.window = words(&[
        "ROW_NUMBER",
        "RANK",
        "DENSE_RANK",
        "NTILE",
        "LAG",
        "LEAD",
        "FIRST_VALUE",
        "LAST_VALUE",
        "NTH_VALUE",
        "CUME_DIST",
        "PERCENT_RANK",
    ]);
    config.reserved_words = words(&[
        "TABLE", "COLUMN", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER", "INTO",
        "VALUES", "SET", "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "DEFAULT", "CHECK", "UNIQUE",
        "INDEX", "VIEW", "USER", "GRANT", "TO",
    ]);
    config.data_types = words(&[
        "SMALLINT",
        "INTEGER",
        "INT",
        "BIGINT",
        "DECIMAL",
        "NUMERIC",
        "REAL",
        "FLOAT",
        "DOUBLE PRECISION",
        "CHAR",
        "CHARACTER",
        "VARCHAR",
        "CLOB",
        "BLOB",
        "DATE",
        "TIME",
        "TIMESTAMP",
        "INTERVAL",
        "BOOLEAN",
    ]);
    config
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| String::from(*s)).collect()
}

// ---- clause handlers ---------------------------------------------------

/// `WHERE expr`, `HAVING expr`, `LIMIT expr`.
fn expr_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    Ok(ClauseValue::Expr(ctx.parse_expr()?))
}

fn group_by_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    ctx.expect(TokenType::BY)?;
    Ok(ClauseValue::Exprs(ctx.parse_expr_list()?))
}

fn window_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    Ok(ClauseValue::Windows(ctx.parse_window_defs()?))
}

fn order_by_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    ctx.expect(TokenType::BY)?;
    Ok(ClauseValue::OrderBy(ctx.parse_order_items()?))
}

/// `OFFSET expr [ROW | ROWS]`; the noise word is accepted and dropped.
fn offset_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    let expr = ctx.parse_expr()?;
    if !ctx.eat(TokenType::ROWS) {
        ctx.eat(TokenType::ROW);
    }
    Ok(ClauseValue::Expr(expr))
}

/// `FETCH {FIRST | NEXT} [count] {ROW | ROWS} ONLY`. An omitted count
/// means one row and is materialized as a literal so the slot always
/// carries an expression.
fn fetch_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    if !ctx.eat(TokenType::FIRST) && !ctx.eat(TokenType::NEXT) {
        return Err(ctx.error_here(format!(
            "expected FIRST or NEXT after FETCH, found {}",
            ctx.cur().ty
        )));
    }
    let count = if ctx.at(TokenType::ROW) || ctx.at(TokenType::ROWS) {
        let here = ctx.cur().pos;
        Expr::Literal {
            kind: LiteralKind::Number,
            text: String::from("1"),
            span: Span::new(here, here),
        }
    } else {
        ctx.parse_expr()?
    };
    if !ctx.eat(TokenType::ROWS) && !ctx.eat(TokenType::ROW) {
        return Err(ctx.error_here(format!(
            "expected ROW or ROWS in FETCH, found {}",
            ctx.cur().ty
        )));
    }
    ctx.expect(TokenType::ONLY)?;
    Ok(ClauseValue::Expr(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_is_shared() {
        assert!(Arc::ptr_eq(&ansi(), &ansi()));
    }

    #[test]
    fn test_ansi_clause_table() {
        let d = ansi();
        assert!(d.is_clause_token(TokenType::WHERE));
        assert!(d.is_clause_token(TokenType::FETCH));
        assert!(!d.is_clause_token(TokenType::SELECT));
        let order = d.clause_for(TokenType::ORDER).unwrap();
        assert_eq!(order.display, "ORDER BY");
        assert!(!order.inline);
        let limit = d.clause_for(TokenType::LIMIT).unwrap();
        assert!(limit.inline);
    }

    #[test]
    fn test_ansi_operator_precedences() {
        let d = ansi();
        assert_eq!(d.precedence_of(TokenType::EQ), Precedence::Comparison);
        assert_eq!(d.precedence_of(TokenType::PLUS), Precedence::Addition);
        assert_eq!(d.precedence_of(TokenType::ASTERISK), Precedence::Multiply);
        assert_eq!(d.precedence_of(TokenType::DOT), Precedence::Lowest);
    }

    #[test]
    fn test_ansi_joins() {
        let d = ansi();
        let left = d.join_def(TokenType::LEFT).unwrap();
        assert_eq!(left.modifier, Some(TokenType::OUTER));
        assert!(left.requires_on);
        let cross = d.join_def(TokenType::CROSS).unwrap();
        assert!(!cross.requires_on);
        assert!(!cross.allows_using);
    }

    #[test]
    fn test_ansi_function_classification_folds_case() {
        let d = ansi();
        assert!(d.is_aggregate_function("count"));
        assert!(d.is_aggregate_function("Sum"));
        assert!(d.is_window_function("row_number"));
        assert!(!d.is_aggregate_function("row_number"));
    }
}
