//! The PostgreSQL dialect.
//!
//! A thin layer over the ANSI base: lowercase identifier folding, `$n`
//! placeholders, `ILIKE`, and the `::` cast operator. Deliberately no
//! `QUALIFY` and no star modifiers, so statements using those parse here
//! with dialect-rejection diagnostics rather than syntax noise.

use std::sync::{Arc, OnceLock};

use argot_sql_core::dialect::{
    ansi, Dialect, DialectBuilder, DialectConfig, IdentNormalization, PlaceholderStyle, Precedence,
};
use argot_sql_core::lexer::{register_keyword, TokenType};

use crate::cast::double_colon_cast;

/// Returns the shared PostgreSQL dialect, built once per process.
pub fn postgres() -> Arc<Dialect> {
    static POSTGRES: OnceLock<Arc<Dialect>> = OnceLock::new();
    Arc::clone(POSTGRES.get_or_init(|| Arc::new(build())))
}

fn build() -> Dialect {
    let ilike = register_keyword("ILIKE");

    DialectBuilder::new(config())
        .inherit(&ansi())
        .keyword("ILIKE")
        .like_operator(ilike)
        .infix(TokenType::DOUBLE_COLON, Precedence::Postfix, double_colon_cast)
        .build()
}

fn config() -> DialectConfig {
    let mut config = DialectConfig::named("postgres");
    config.quoting.normalization = IdentNormalization::Lower;
    config.placeholder = PlaceholderStyle::Dollar;
    config.default_schema = Some(String::from("public"));
    config.functions.aggregate = words(&[
        "ARRAY_AGG",
        "BOOL_AND",
        "BOOL_OR",
        "BIT_AND",
        "BIT_OR",
        "CORR",
        "COVAR_POP",
        "COVAR_SAMP",
        "JSON_AGG",
        "JSONB_AGG",
        "STRING_AGG",
    ]);
    config.functions.generator = words(&["GENERATE_SERIES", "GENERATE_SUBSCRIPTS", "UNNEST"]);
    config.keywords = words(&["ILIKE"]);
    config.reserved_words = words(&["RETURNING", "ANALYZE", "VERBOSE", "FREEZE", "DO"]);
    config.data_types = words(&[
        "TEXT",
        "BYTEA",
        "UUID",
        "JSON",
        "JSONB",
        "INET",
        "CIDR",
        "MACADDR",
        "SERIAL",
        "BIGSERIAL",
        "TIMESTAMPTZ",
        "TIMETZ",
        "MONEY",
    ]);
    config
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| String::from(*s)).collect()
}
