#![allow(dead_code)]

use argot_sql_core::ast::{Expr, SelectCore, SelectItemKind};
use argot_sql_core::dialect::ansi;
use argot_sql_core::parser::{Diagnostic, Parse, Parser};
use argot_sql_core::format;

pub fn parse(sql: &str) -> Parse {
    let dialect = ansi();
    Parser::new(sql, &dialect).parse()
}

pub fn parse_clean(sql: &str) -> Parse {
    let parse = parse(sql);
    assert!(
        parse.diagnostics.is_empty(),
        "Unexpected diagnostics for: {sql}\n{:#?}",
        parse.diagnostics
    );
    parse
}

pub fn parse_core(sql: &str) -> SelectCore {
    parse_clean(sql).stmt.body.left
}

pub fn diagnostics(sql: &str) -> Vec<Diagnostic> {
    let diags = parse(sql).diagnostics;
    assert!(!diags.is_empty(), "Expected diagnostics for: {sql}");
    diags
}

pub fn first_expr(sql: &str) -> Expr {
    let core = parse_core(sql);
    let item = core
        .items
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("No select items in: {sql}"));
    match item.kind {
        SelectItemKind::Expr { expr, .. } => expr,
        other => panic!("Expected expression item for {sql}, got {other:?}"),
    }
}

pub fn render(sql: &str) -> String {
    let dialect = ansi();
    let parse = parse_clean(sql);
    format(&parse.stmt, &dialect)
}

/// Verifies that formatting produces a fixed point: the rendered output
/// re-parses without diagnostics and renders to the same string again.
pub fn round_trip(sql: &str) {
    let dialect = ansi();
    let first = Parser::new(sql, &dialect).parse();
    assert!(
        first.diagnostics.is_empty(),
        "Diagnostics for input: {sql}\n{:#?}",
        first.diagnostics
    );
    let rendered1 = format(&first.stmt, &dialect);
    let second = Parser::new(&rendered1, &dialect).parse();
    assert!(
        second.diagnostics.is_empty(),
        "Rendered output does not re-parse.\n  Input:    {sql}\n  Rendered: {rendered1}\n{:#?}",
        second.diagnostics
    );
    let rendered2 = format(&second.stmt, &dialect);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
