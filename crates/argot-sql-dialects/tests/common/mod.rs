#![allow(dead_code)]

use std::sync::Arc;

use argot_sql_core::dialect::Dialect;
use argot_sql_core::parser::{Parse, Parser};
use argot_sql_core::format;

pub fn parse_with(sql: &str, dialect: &Arc<Dialect>) -> Parse {
    Parser::new(sql, dialect).parse()
}

pub fn parse_clean_with(sql: &str, dialect: &Arc<Dialect>) -> Parse {
    let parse = parse_with(sql, dialect);
    assert!(
        parse.diagnostics.is_empty(),
        "Unexpected diagnostics under {} for: {sql}\n{:#?}",
        dialect.name(),
        parse.diagnostics
    );
    parse
}

pub fn render_with(sql: &str, dialect: &Arc<Dialect>) -> String {
    format(&parse_clean_with(sql, dialect).stmt, dialect)
}

/// Verifies the format/parse fixed point under `dialect`: rendered
/// output re-parses without diagnostics and renders identically again.
pub fn round_trip_with(sql: &str, dialect: &Arc<Dialect>) {
    let rendered1 = render_with(sql, dialect);
    let second = parse_with(&rendered1, dialect);
    assert!(
        second.diagnostics.is_empty(),
        "Rendered output does not re-parse under {}.\n  Input:    {sql}\n  Rendered: {rendered1}\n{:#?}",
        dialect.name(),
        second.diagnostics
    );
    let rendered2 = format(&second.stmt, dialect);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed under {}.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}",
        dialect.name()
    );
}
