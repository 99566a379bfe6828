//! The SQLite dialect.
//!
//! Small on purpose: backtick identifier quoting, the `GLOB` / `REGEXP` /
//! `MATCH` pattern operators, and SQLite's loose function vocabulary.
//! Everything else is the ANSI base.

use std::sync::{Arc, OnceLock};

use argot_sql_core::dialect::{ansi, Dialect, DialectBuilder, DialectConfig};
use argot_sql_core::lexer::register_keyword;

/// Returns the shared SQLite dialect, built once per process.
pub fn sqlite() -> Arc<Dialect> {
    static SQLITE: OnceLock<Arc<Dialect>> = OnceLock::new();
    Arc::clone(SQLITE.get_or_init(|| Arc::new(build())))
}

fn build() -> Dialect {
    let glob = register_keyword("GLOB");
    let regexp = register_keyword("REGEXP");
    let match_op = register_keyword("MATCH");

    DialectBuilder::new(config())
        .inherit(&ansi())
        .keyword("GLOB")
        .keyword("REGEXP")
        .keyword("MATCH")
        .like_operator(glob)
        .like_operator(regexp)
        .like_operator(match_op)
        .build()
}

fn config() -> DialectConfig {
    let mut config = DialectConfig::named("sqlite");
    config.quoting.open = '`';
    config.quoting.close = '`';
    config.quoting.escape = '`';
    config.default_schema = Some(String::from("main"));
    config.functions.aggregate = words(&["GROUP_CONCAT", "TOTAL"]);
    config.keywords = words(&["GLOB", "REGEXP", "MATCH"]);
    config.reserved_words = words(&[
        "AUTOINCREMENT",
        "PRAGMA",
        "VACUUM",
        "ATTACH",
        "DETACH",
        "REINDEX",
    ]);
    config.data_types = words(&["TEXT", "BLOB", "REAL", "NUMERIC"]);
    config
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| String::from(*s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot_sql_core::ast::{Expr, SelectItemKind};
    use argot_sql_core::parser::Parser;

    #[test]
    fn test_sqlite_is_shared() {
        assert!(Arc::ptr_eq(&sqlite(), &sqlite()));
    }

    #[test]
    fn test_backtick_quoted_identifiers() {
        let d = sqlite();
        let parse = Parser::new("SELECT `from` FROM t", &d).parse();
        assert!(parse.diagnostics.is_empty());
        let SelectItemKind::Expr { expr, .. } = &parse.stmt.body.left.items[0].kind else {
            panic!("expected expression item");
        };
        assert!(matches!(
            expr,
            Expr::ColumnRef { column, .. } if column == "from"
        ));
        assert_eq!(d.quote_ident("from"), "`from`");
    }

    #[test]
    fn test_glob_predicate() {
        let d = sqlite();
        let parse = Parser::new("SELECT a FROM t WHERE name GLOB 'a*'", &d).parse();
        assert!(parse.diagnostics.is_empty());
        let Some(Expr::Like { op, .. }) = &parse.stmt.body.left.where_clause else {
            panic!("expected LIKE-family predicate");
        };
        assert_eq!(op.name(), "GLOB");
    }

    #[test]
    fn test_double_colon_is_not_sqlite() {
        let d = sqlite();
        let parse = Parser::new("SELECT a::INTEGER FROM t", &d).parse();
        assert!(!parse.diagnostics.is_empty());
    }

    #[test]
    fn test_group_concat_is_aggregate() {
        let d = sqlite();
        assert!(d.is_aggregate_function("group_concat"));
        assert!(d.is_aggregate_function("total"));
        assert!(d.is_aggregate_function("count"));
    }
}
