//! Building a dialect from the outside: everything a dialect can add
//! (clauses, operators, prefixes, joins, vocabulary, quoting) goes
//! through [`DialectBuilder`] with no access to parser internals.
//!
//! The dialect under test is a small time-series flavor: a `SAMPLE`
//! clause, a `<->` distance operator, `DATE '...'` literals, and an
//! `ANY JOIN`.

use std::sync::{Arc, OnceLock};

use argot_sql_core::ast::{ClauseExt, Expr, LiteralKind, SelectItemKind, TableRef};
use argot_sql_core::dialect::{
    ansi, ClauseSlot, ClauseValue, Dialect, DialectBuilder, DialectConfig, JoinDef, Precedence,
    QuotingRule,
};
use argot_sql_core::lexer::register_keyword;
use argot_sql_core::parser::{ClauseCtx, Diagnostic, DiagnosticKind, Parse, Parser};
use argot_sql_core::{format, TokenType};

fn tsdb() -> Arc<Dialect> {
    static DIALECT: OnceLock<Arc<Dialect>> = OnceLock::new();
    Arc::clone(DIALECT.get_or_init(|| Arc::new(build())))
}

fn build() -> Dialect {
    let sample = register_keyword("SAMPLE");
    let date = register_keyword("DATE");
    let any = register_keyword("ANY");
    let distance = register_keyword("<->");

    let mut config = DialectConfig::named("tsdb");
    config.quoting = QuotingRule {
        open: '[',
        close: ']',
        escape: ']',
        normalization: config.quoting.normalization,
    };

    DialectBuilder::new(config)
        .inherit(&ansi())
        .keyword("SAMPLE")
        .keyword("DATE")
        .keyword("ANY")
        .symbol("<->")
        .operator(distance, Precedence::Comparison)
        .clause(sample, "SAMPLE", ClauseSlot::Extensions, true, sample_clause)
        .prefix(date, date_literal)
        .join(any, JoinDef::conditioned("ANY"))
        .build()
}

fn sample_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    let start = ctx.cur().pos;
    let fraction = ctx.parse_expr()?;
    Ok(ClauseValue::Extension(ClauseExt {
        keyword: String::from("SAMPLE"),
        exprs: vec![fraction],
        span: ctx.span_from(start),
    }))
}

/// `DATE '2024-01-01'` desugars to a cast, which already prints and
/// re-parses canonically.
fn date_literal(ctx: &mut ClauseCtx<'_, '_>) -> Result<Expr, Diagnostic> {
    let start = ctx.cur().pos;
    ctx.advance();
    let tok = ctx.cur().clone();
    if tok.ty != TokenType::STRING {
        return Err(ctx.error_here(format!("expected a string after DATE, found {}", tok.ty)));
    }
    ctx.advance();
    Ok(Expr::Cast {
        expr: Box::new(Expr::Literal {
            kind: LiteralKind::String,
            span: tok.span(),
            text: tok.text,
        }),
        type_name: String::from("DATE"),
        span: ctx.span_from(start),
    })
}

fn parse_tsdb(sql: &str) -> Parse {
    let dialect = tsdb();
    let parse = Parser::new(sql, &dialect).parse();
    assert!(
        parse.diagnostics.is_empty(),
        "Unexpected diagnostics for: {sql}\n{:#?}",
        parse.diagnostics
    );
    parse
}

fn render_tsdb(sql: &str) -> String {
    format(&parse_tsdb(sql).stmt, &tsdb())
}

#[test]
fn extension_clause_lands_in_the_bucket() {
    let parse = parse_tsdb("SELECT id FROM metrics SAMPLE 0.1");
    let core = &parse.stmt.body.left;
    assert_eq!(core.extensions.len(), 1);
    assert_eq!(core.extensions[0].keyword, "SAMPLE");
    assert!(matches!(
        &core.extensions[0].exprs[0],
        Expr::Literal { text, .. } if text == "0.1"
    ));
}

#[test]
fn extension_clause_prints_and_reparses() {
    let out = render_tsdb("SELECT id FROM metrics SAMPLE 0.1");
    assert!(out.ends_with("SAMPLE 0.1\n"));
    let again = format(&parse_tsdb(&out).stmt, &tsdb());
    assert_eq!(out, again);
}

#[test]
fn custom_symbol_operator() {
    let parse = parse_tsdb("SELECT a FROM t WHERE point <-> origin < 5");
    let Some(Expr::Binary { op: TokenType::LT, left, .. }) =
        &parse.stmt.body.left.where_clause
    else {
        panic!("expected < at the top");
    };
    let Expr::Binary { op, .. } = &**left else {
        panic!("expected distance operator");
    };
    assert_eq!(op.name(), "<->");
    assert!(op.is_dynamic());
}

#[test]
fn prefix_handler_makes_date_literals() {
    let parse = parse_tsdb("SELECT DATE '2024-06-01' FROM t");
    let item = &parse.stmt.body.left.items[0];
    let SelectItemKind::Expr { expr, .. } = &item.kind else {
        panic!("expected expression item");
    };
    assert!(matches!(
        expr,
        Expr::Cast { type_name, .. } if type_name == "DATE"
    ));
    let out = render_tsdb("SELECT DATE '2024-06-01' FROM t");
    assert!(out.contains("CAST('2024-06-01' AS DATE)"));
}

#[test]
fn prefix_handler_rejects_non_string() {
    let dialect = tsdb();
    let parse = Parser::new("SELECT DATE 42 FROM t", &dialect).parse();
    assert!(parse
        .diagnostics
        .iter()
        .any(|d| d.message.contains("expected a string after DATE")));
}

#[test]
fn registered_join_type() {
    let parse = parse_tsdb("SELECT a FROM t ANY JOIN u ON t.id = u.id");
    let from = parse.stmt.body.left.from.as_ref().unwrap();
    assert_eq!(from.joins[0].join_type, "ANY");
    assert!(from.joins[0].condition.is_some());
}

#[test]
fn config_quoting_drives_lexing_and_printing() {
    let parse = parse_tsdb("SELECT [order] FROM t");
    let core = &parse.stmt.body.left;
    assert!(matches!(
        &core.items[0].kind,
        SelectItemKind::Expr {
            expr: Expr::ColumnRef { column, .. },
            ..
        } if column == "order"
    ));
    let out = render_tsdb("SELECT [order] FROM t");
    assert!(out.contains("[order]"));
}

#[test]
fn foreign_clause_is_rejected_with_dialect_name() {
    // Building tsdb registers SAMPLE globally; ANSI then recognizes the
    // word but refuses the clause.
    let _ = tsdb();
    let dialect = ansi();
    let parse = Parser::new("SELECT id FROM metrics SAMPLE 0.1", &dialect).parse();
    assert_eq!(parse.diagnostics.len(), 1);
    let diag = &parse.diagnostics[0];
    assert_eq!(diag.kind, DiagnosticKind::DialectRejection);
    assert_eq!(diag.message, "SAMPLE is not supported in ansi dialect");
}

#[test]
fn rejection_recovers_and_keeps_later_clauses() {
    let _ = tsdb();
    let dialect = ansi();
    let parse = Parser::new(
        "SELECT id FROM metrics SAMPLE 0.1 ORDER BY id",
        &dialect,
    )
    .parse();
    assert!(parse
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::DialectRejection));
    assert_eq!(parse.stmt.body.left.order_by.len(), 1);
}

#[test]
fn inherited_grammar_still_works() {
    let parse = parse_tsdb(
        "SELECT dept, COUNT(*) FROM emp WHERE active = TRUE GROUP BY dept HAVING COUNT(*) > 2",
    );
    let core = &parse.stmt.body.left;
    assert_eq!(core.group_by.len(), 1);
    assert!(core.having.is_some());
    assert!(matches!(
        &core.from.as_ref().unwrap().source,
        TableRef::Named { name, .. } if name == "emp"
    ));
}
