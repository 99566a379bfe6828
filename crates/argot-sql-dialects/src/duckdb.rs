//! The DuckDB dialect.
//!
//! DuckDB layers the most syntax onto the ANSI base: the `QUALIFY`
//! clause, `GROUP BY ALL` and `ORDER BY ALL`, star modifiers
//! (`EXCLUDE`, `REPLACE`, `RENAME`), `SEMI` / `ANTI` / `ASOF` /
//! `POSITIONAL` joins, `PIVOT` and `UNPIVOT` table sources, lambdas,
//! list and struct literals, bracket indexing, `::` casts, integer
//! division `//`, and `ILIKE`.

use std::sync::{Arc, OnceLock};

use argot_sql_core::ast::{
    CommentSet, Expr, IndexOp, RenameItem, ReplaceItem, StarModifier, StructField, TableRef,
    UnpivotInGroup,
};
use argot_sql_core::dialect::{
    ansi, ClauseSlot, ClauseValue, Dialect, DialectBuilder, DialectConfig, JoinDef, Precedence,
};
use argot_sql_core::lexer::{register_keyword, TokenType};
use argot_sql_core::parser::{ClauseCtx, Diagnostic};

use crate::cast::double_colon_cast;

/// Returns the shared DuckDB dialect, built once per process.
pub fn duckdb() -> Arc<Dialect> {
    static DUCKDB: OnceLock<Arc<Dialect>> = OnceLock::new();
    Arc::clone(DUCKDB.get_or_init(|| Arc::new(build())))
}

fn build() -> Dialect {
    let qualify = register_keyword("QUALIFY");
    let exclude = register_keyword("EXCLUDE");
    let replace = register_keyword("REPLACE");
    let rename = register_keyword("RENAME");
    let semi = register_keyword("SEMI");
    let anti = register_keyword("ANTI");
    let asof = register_keyword("ASOF");
    let positional = register_keyword("POSITIONAL");
    let pivot = register_keyword("PIVOT");
    let unpivot = register_keyword("UNPIVOT");
    let ilike = register_keyword("ILIKE");
    let for_kw = register_keyword("FOR");
    let int_div = register_keyword("//");
    let arrow = register_keyword("->");

    DialectBuilder::new(config())
        .inherit(&ansi())
        .keyword("QUALIFY")
        .keyword("EXCLUDE")
        .keyword("REPLACE")
        .keyword("RENAME")
        .keyword("SEMI")
        .keyword("ANTI")
        .keyword("ASOF")
        .keyword("POSITIONAL")
        .keyword("PIVOT")
        .keyword("UNPIVOT")
        .keyword("ILIKE")
        .keyword("FOR")
        .symbol("//")
        .symbol("->")
        .operator(int_div, Precedence::Multiply)
        .infix(arrow, Precedence::Comparison, lambda)
        .infix(TokenType::DOUBLE_COLON, Precedence::Postfix, double_colon_cast)
        .infix(TokenType::LBRACKET, Precedence::Postfix, index)
        .prefix(TokenType::LBRACKET, list_literal)
        .prefix(TokenType::LBRACE, struct_literal)
        .like_operator(ilike)
        .clause(qualify, "QUALIFY", ClauseSlot::Qualify, false, qualify_clause)
        .clause(
            TokenType::GROUP,
            "GROUP BY",
            ClauseSlot::GroupBy,
            false,
            group_by_clause,
        )
        .clause(
            TokenType::ORDER,
            "ORDER BY",
            ClauseSlot::OrderBy,
            false,
            order_by_clause,
        )
        .star_modifier(exclude, exclude_modifier)
        .star_modifier(replace, replace_modifier)
        .star_modifier(rename, rename_modifier)
        .join(semi, JoinDef::conditioned("SEMI"))
        .join(anti, JoinDef::conditioned("ANTI"))
        .join(
            asof,
            JoinDef::conditioned("ASOF").with_compounds(&[TokenType::LEFT]),
        )
        .join(positional, JoinDef::condition_free("POSITIONAL"))
        .join(
            TokenType::LEFT,
            JoinDef::conditioned("LEFT")
                .with_modifier(TokenType::OUTER)
                .with_compounds(&[semi, anti]),
        )
        .from_item(pivot, move |ctx: &mut ClauseCtx<'_, '_>, base: TableRef| {
            parse_pivot(ctx, base, for_kw)
        })
        .from_item(unpivot, move |ctx: &mut ClauseCtx<'_, '_>, base: TableRef| {
            parse_unpivot(ctx, base, for_kw)
        })
        .build()
}

fn config() -> DialectConfig {
    let mut config = DialectConfig::named("duckdb");
    config.default_schema = Some(String::from("main"));
    config.functions.aggregate = words(&[
        "ARG_MAX",
        "ARG_MIN",
        "BOOL_AND",
        "BOOL_OR",
        "LIST",
        "MEDIAN",
        "MODE",
        "QUANTILE_CONT",
        "QUANTILE_DISC",
        "STRING_AGG",
    ]);
    config.functions.generator = words(&["GENERATE_SERIES", "RANGE", "UNNEST"]);
    config.functions.table = words(&[
        "READ_CSV",
        "READ_CSV_AUTO",
        "READ_JSON",
        "READ_PARQUET",
        "GLOB",
    ]);
    config.keywords = words(&[
        "QUALIFY",
        "EXCLUDE",
        "REPLACE",
        "RENAME",
        "SEMI",
        "ANTI",
        "ASOF",
        "POSITIONAL",
        "PIVOT",
        "UNPIVOT",
        "ILIKE",
        "FOR",
    ]);
    config.data_types = words(&[
        "TINYINT",
        "UTINYINT",
        "USMALLINT",
        "UINTEGER",
        "UBIGINT",
        "HUGEINT",
        "UHUGEINT",
        "UUID",
        "JSON",
        "STRUCT",
        "MAP",
        "LIST",
    ]);
    config
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| String::from(*s)).collect()
}

// ---- clauses -----------------------------------------------------------

fn qualify_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    Ok(ClauseValue::Expr(ctx.parse_expr()?))
}

/// `GROUP BY ALL` or the ANSI expression list.
fn group_by_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    ctx.expect(TokenType::BY)?;
    if ctx.eat(TokenType::ALL) {
        return Ok(ClauseValue::All { desc: false });
    }
    Ok(ClauseValue::Exprs(ctx.parse_expr_list()?))
}

/// `ORDER BY ALL [ASC | DESC]` or the ANSI item list.
fn order_by_clause(ctx: &mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> {
    ctx.expect(TokenType::BY)?;
    if ctx.eat(TokenType::ALL) {
        let desc = ctx.eat(TokenType::DESC);
        if !desc {
            ctx.eat(TokenType::ASC);
        }
        return Ok(ClauseValue::All { desc });
    }
    Ok(ClauseValue::OrderBy(ctx.parse_order_items()?))
}

// ---- star modifiers ----------------------------------------------------

/// `EXCLUDE (a, b)`, parens optional around a single column.
fn exclude_modifier(ctx: &mut ClauseCtx<'_, '_>) -> Result<StarModifier, Diagnostic> {
    let start = ctx.cur().pos;
    let mut columns = Vec::new();
    if ctx.eat(TokenType::LPAREN) {
        loop {
            columns.push(ctx.parse_identifier("column name")?);
            if !ctx.eat(TokenType::COMMA) {
                break;
            }
        }
        ctx.expect(TokenType::RPAREN)?;
    } else {
        columns.push(ctx.parse_identifier("column name")?);
    }
    Ok(StarModifier::Exclude {
        columns,
        span: ctx.span_from(start),
    })
}

/// `REPLACE (expr AS name, ...)`
fn replace_modifier(ctx: &mut ClauseCtx<'_, '_>) -> Result<StarModifier, Diagnostic> {
    let start = ctx.cur().pos;
    ctx.expect(TokenType::LPAREN)?;
    let mut items = Vec::new();
    loop {
        let item_start = ctx.cur().pos;
        let expr = ctx.parse_expr()?;
        ctx.expect(TokenType::AS)?;
        let alias = ctx.parse_identifier("replacement column name")?;
        items.push(ReplaceItem {
            expr,
            alias,
            span: ctx.span_from(item_start),
        });
        if !ctx.eat(TokenType::COMMA) {
            break;
        }
    }
    ctx.expect(TokenType::RPAREN)?;
    Ok(StarModifier::Replace {
        items,
        span: ctx.span_from(start),
    })
}

/// `RENAME (old AS new, ...)`
fn rename_modifier(ctx: &mut ClauseCtx<'_, '_>) -> Result<StarModifier, Diagnostic> {
    let start = ctx.cur().pos;
    ctx.expect(TokenType::LPAREN)?;
    let mut items = Vec::new();
    loop {
        let item_start = ctx.cur().pos;
        let from = ctx.parse_identifier("column name")?;
        ctx.expect(TokenType::AS)?;
        let to = ctx.parse_identifier("new column name")?;
        items.push(RenameItem {
            from,
            to,
            span: ctx.span_from(item_start),
        });
        if !ctx.eat(TokenType::COMMA) {
            break;
        }
    }
    ctx.expect(TokenType::RPAREN)?;
    Ok(StarModifier::Rename {
        items,
        span: ctx.span_from(start),
    })
}

// ---- expressions -------------------------------------------------------

/// `x -> body` and `(x, y) -> body`.
///
/// The parameter list arrives as the already-parsed left operand; only
/// plain identifiers, possibly parenthesized and comma-separated, are
/// valid there.
fn lambda(ctx: &mut ClauseCtx<'_, '_>, left: Expr) -> Result<Expr, Diagnostic> {
    let mut params = Vec::new();
    if !collect_lambda_params(&left, &mut params) {
        return Err(Diagnostic::syntax(
            "lambda parameters must be plain identifiers",
            left.span(),
        ));
    }
    let start = left.span().start;
    ctx.advance();
    let body = ctx.parse_expr()?;
    Ok(Expr::Lambda {
        params,
        body: Box::new(body),
        span: ctx.span_from(start),
    })
}

fn collect_lambda_params(expr: &Expr, out: &mut Vec<String>) -> bool {
    match expr {
        Expr::ColumnRef {
            table: None,
            column,
            ..
        } => {
            out.push(column.clone());
            true
        }
        Expr::Paren { inner, .. } => collect_lambda_params(inner, out),
        Expr::Binary {
            left,
            op: TokenType::COMMA,
            right,
            ..
        } => collect_lambda_params(left, out) && collect_lambda_params(right, out),
        _ => false,
    }
}

/// `target[i]` and `target[a:b]`, either slice bound optional.
fn index(ctx: &mut ClauseCtx<'_, '_>, left: Expr) -> Result<Expr, Diagnostic> {
    let start = left.span().start;
    ctx.advance();
    let op = if ctx.eat(TokenType::COLON) {
        IndexOp::Slice {
            start: None,
            stop: slice_bound(ctx)?,
        }
    } else {
        let first = ctx.parse_expr()?;
        if ctx.eat(TokenType::COLON) {
            IndexOp::Slice {
                start: Some(Box::new(first)),
                stop: slice_bound(ctx)?,
            }
        } else {
            IndexOp::Element(Box::new(first))
        }
    };
    ctx.expect(TokenType::RBRACKET)?;
    Ok(Expr::Index {
        target: Box::new(left),
        op,
        span: ctx.span_from(start),
    })
}

fn slice_bound(ctx: &mut ClauseCtx<'_, '_>) -> Result<Option<Box<Expr>>, Diagnostic> {
    if ctx.at(TokenType::RBRACKET) {
        return Ok(None);
    }
    Ok(Some(Box::new(ctx.parse_expr()?)))
}

/// `[a, b, c]`, empty allowed.
fn list_literal(ctx: &mut ClauseCtx<'_, '_>) -> Result<Expr, Diagnostic> {
    let start = ctx.cur().pos;
    ctx.advance();
    let elements = if ctx.at(TokenType::RBRACKET) {
        Vec::new()
    } else {
        ctx.parse_expr_list()?
    };
    ctx.expect(TokenType::RBRACKET)?;
    Ok(Expr::List {
        elements,
        span: ctx.span_from(start),
    })
}

/// `{'key': value, ...}`; keys are string literals.
fn struct_literal(ctx: &mut ClauseCtx<'_, '_>) -> Result<Expr, Diagnostic> {
    let start = ctx.cur().pos;
    ctx.advance();
    let mut fields = Vec::new();
    if !ctx.at(TokenType::RBRACE) {
        loop {
            let field_start = ctx.cur().pos;
            let name = struct_key(ctx)?;
            ctx.expect(TokenType::COLON)?;
            let value = ctx.parse_expr()?;
            fields.push(StructField {
                name,
                value,
                span: ctx.span_from(field_start),
            });
            if !ctx.eat(TokenType::COMMA) {
                break;
            }
        }
    }
    ctx.expect(TokenType::RBRACE)?;
    Ok(Expr::Struct {
        fields,
        span: ctx.span_from(start),
    })
}

/// A struct key: a string literal (quotes stripped) or a bare identifier.
fn struct_key(ctx: &mut ClauseCtx<'_, '_>) -> Result<String, Diagnostic> {
    if ctx.at(TokenType::STRING) {
        let text = ctx.advance().text;
        let inner = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(&text);
        return Ok(inner.replace("''", "'"));
    }
    ctx.parse_identifier("struct field name")
}

// ---- table sources -----------------------------------------------------

/// `source PIVOT (aggregates FOR column IN (values | *)) [alias]`
fn parse_pivot(
    ctx: &mut ClauseCtx<'_, '_>,
    source: TableRef,
    for_kw: TokenType,
) -> Result<TableRef, Diagnostic> {
    let start = source.span().start;
    ctx.expect(TokenType::LPAREN)?;
    let aggregates = ctx.parse_expr_list()?;
    ctx.expect(for_kw)?;
    let for_column = ctx.parse_identifier("pivot column")?;
    ctx.expect(TokenType::IN)?;
    ctx.expect(TokenType::LPAREN)?;
    let (in_values, in_star) = if ctx.eat(TokenType::ASTERISK) {
        (Vec::new(), true)
    } else {
        (ctx.parse_expr_list()?, false)
    };
    ctx.expect(TokenType::RPAREN)?;
    ctx.expect(TokenType::RPAREN)?;
    let alias = ctx.parse_alias();
    Ok(TableRef::Pivot {
        source: Box::new(source),
        aggregates,
        for_column,
        in_values,
        in_star,
        alias,
        span: ctx.span_from(start),
        comments: CommentSet::new(),
    })
}

/// `source UNPIVOT (value-columns FOR name-column IN (groups)) [alias]`
fn parse_unpivot(
    ctx: &mut ClauseCtx<'_, '_>,
    source: TableRef,
    for_kw: TokenType,
) -> Result<TableRef, Diagnostic> {
    let start = source.span().start;
    ctx.expect(TokenType::LPAREN)?;
    let value_columns = parse_column_group(ctx)?;
    ctx.expect(for_kw)?;
    let name_column = ctx.parse_identifier("unpivot name column")?;
    ctx.expect(TokenType::IN)?;
    ctx.expect(TokenType::LPAREN)?;
    let mut in_groups = Vec::new();
    loop {
        let group_start = ctx.cur().pos;
        let columns = parse_column_group(ctx)?;
        let alias = if ctx.eat(TokenType::AS) {
            Some(ctx.parse_identifier("group label")?)
        } else {
            None
        };
        in_groups.push(UnpivotInGroup {
            columns,
            alias,
            span: ctx.span_from(group_start),
        });
        if !ctx.eat(TokenType::COMMA) {
            break;
        }
    }
    ctx.expect(TokenType::RPAREN)?;
    ctx.expect(TokenType::RPAREN)?;
    let alias = ctx.parse_alias();
    Ok(TableRef::Unpivot {
        source: Box::new(source),
        value_columns,
        name_column,
        in_groups,
        alias,
        span: ctx.span_from(start),
        comments: CommentSet::new(),
    })
}

/// A single column name or a parenthesized list of them.
fn parse_column_group(ctx: &mut ClauseCtx<'_, '_>) -> Result<Vec<String>, Diagnostic> {
    if ctx.eat(TokenType::LPAREN) {
        let mut columns = Vec::new();
        loop {
            columns.push(ctx.parse_identifier("column name")?);
            if !ctx.eat(TokenType::COMMA) {
                break;
            }
        }
        ctx.expect(TokenType::RPAREN)?;
        return Ok(columns);
    }
    Ok(vec![ctx.parse_identifier("column name")?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot_sql_core::ast::SelectItemKind;
    use argot_sql_core::parser::{Parse, Parser};

    fn parse_clean(src: &str) -> Parse {
        let dialect = duckdb();
        let parse = Parser::new(src, &dialect).parse();
        assert!(
            parse.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            parse.diagnostics
        );
        parse
    }

    fn first_expr(src: &str) -> Expr {
        let parse = parse_clean(src);
        match &parse.stmt.body.left.items[0].kind {
            SelectItemKind::Expr { expr, .. } => expr.clone(),
            other => panic!("expected an expression item, got {other:?}"),
        }
    }

    #[test]
    fn test_duckdb_is_shared() {
        assert!(Arc::ptr_eq(&duckdb(), &duckdb()));
    }

    #[test]
    fn test_qualify_clause() {
        let parse = parse_clean(
            "SELECT id, ROW_NUMBER() OVER (PARTITION BY city ORDER BY total) AS rn \
             FROM orders QUALIFY rn = 1",
        );
        assert!(parse.stmt.body.left.qualify.is_some());
    }

    #[test]
    fn test_group_by_all() {
        let parse = parse_clean("SELECT city, SUM(total) FROM orders GROUP BY ALL");
        let core = &parse.stmt.body.left;
        assert!(core.group_by_all);
        assert!(core.group_by.is_empty());
    }

    #[test]
    fn test_order_by_all_desc() {
        let parse = parse_clean("SELECT a, b FROM t ORDER BY ALL DESC");
        let core = &parse.stmt.body.left;
        assert!(core.order_by_all);
        assert!(core.order_by_all_desc);
    }

    #[test]
    fn test_star_modifiers_stack() {
        let parse = parse_clean(
            "SELECT * EXCLUDE (secret) REPLACE (total / 100 AS total) RENAME (id AS order_id) \
             FROM orders",
        );
        let modifiers = &parse.stmt.body.left.items[0].modifiers;
        assert_eq!(modifiers.len(), 3);
        assert!(matches!(modifiers[0], StarModifier::Exclude { .. }));
        assert!(matches!(modifiers[1], StarModifier::Replace { .. }));
        assert!(matches!(modifiers[2], StarModifier::Rename { .. }));
    }

    #[test]
    fn test_exclude_without_parens() {
        let parse = parse_clean("SELECT * EXCLUDE secret FROM t");
        let StarModifier::Exclude { columns, .. } = &parse.stmt.body.left.items[0].modifiers[0]
        else {
            panic!("expected exclude");
        };
        assert_eq!(columns, &[String::from("secret")]);
    }

    #[test]
    fn test_semi_and_compound_joins() {
        let parse = parse_clean("SELECT a FROM t SEMI JOIN u ON t.id = u.id");
        assert_eq!(parse.stmt.body.left.from.as_ref().unwrap().joins[0].join_type, "SEMI");

        let parse = parse_clean("SELECT a FROM t LEFT ANTI JOIN u ON t.id = u.id");
        assert_eq!(
            parse.stmt.body.left.from.as_ref().unwrap().joins[0].join_type,
            "LEFT ANTI"
        );
    }

    #[test]
    fn test_asof_join() {
        let parse = parse_clean("SELECT a FROM trades ASOF JOIN prices ON trades.ts >= prices.ts");
        assert_eq!(parse.stmt.body.left.from.as_ref().unwrap().joins[0].join_type, "ASOF");

        let parse = parse_clean("SELECT a FROM trades ASOF LEFT JOIN prices ON trades.ts >= prices.ts");
        assert_eq!(
            parse.stmt.body.left.from.as_ref().unwrap().joins[0].join_type,
            "ASOF LEFT"
        );
    }

    #[test]
    fn test_positional_join_rejects_condition() {
        let dialect = duckdb();
        let parse = Parser::new("SELECT a FROM t POSITIONAL JOIN u", &dialect).parse();
        assert!(parse.diagnostics.is_empty());

        let parse = Parser::new("SELECT a FROM t POSITIONAL JOIN u ON t.id = u.id", &dialect).parse();
        assert!(parse
            .diagnostics
            .iter()
            .any(|d| d.message.contains("POSITIONAL")));
    }

    #[test]
    fn test_pivot_source() {
        let parse = parse_clean(
            "SELECT * FROM sales PIVOT (SUM(amount) FOR quarter IN ('Q1', 'Q2')) AS p",
        );
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        let TableRef::Pivot {
            aggregates,
            for_column,
            in_values,
            in_star,
            alias,
            ..
        } = &from.source
        else {
            panic!("expected pivot source");
        };
        assert_eq!(aggregates.len(), 1);
        assert_eq!(for_column, "quarter");
        assert_eq!(in_values.len(), 2);
        assert!(!in_star);
        assert_eq!(alias.as_deref(), Some("p"));
    }

    #[test]
    fn test_pivot_in_star() {
        let parse = parse_clean("SELECT * FROM sales PIVOT (COUNT(*) FOR region IN (*))");
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        let TableRef::Pivot { in_star, in_values, .. } = &from.source else {
            panic!("expected pivot source");
        };
        assert!(in_star);
        assert!(in_values.is_empty());
    }

    #[test]
    fn test_unpivot_source() {
        let parse = parse_clean(
            "SELECT * FROM monthly UNPIVOT ((jan, feb) FOR month IN ((jan, feb) AS q1))",
        );
        let from = parse.stmt.body.left.from.as_ref().unwrap();
        let TableRef::Unpivot {
            value_columns,
            name_column,
            in_groups,
            ..
        } = &from.source
        else {
            panic!("expected unpivot source");
        };
        assert_eq!(value_columns.len(), 2);
        assert_eq!(name_column, "month");
        assert_eq!(in_groups.len(), 1);
        assert_eq!(in_groups[0].alias.as_deref(), Some("q1"));
    }

    #[test]
    fn test_lambda_single_param() {
        let Expr::FuncCall { args, .. } = first_expr("SELECT list_transform(l, x -> x + 1) FROM t")
        else {
            panic!("expected function call");
        };
        let Expr::Lambda { params, body, .. } = &args[1] else {
            panic!("expected lambda argument, got {:?}", args[1]);
        };
        assert_eq!(params, &[String::from("x")]);
        assert!(matches!(**body, Expr::Binary { .. }));
    }

    #[test]
    fn test_lambda_param_list() {
        let Expr::FuncCall { args, .. } =
            first_expr("SELECT list_zip_with(a, b, (x, y) -> x + y) FROM t")
        else {
            panic!("expected function call");
        };
        let Expr::Lambda { params, .. } = &args[2] else {
            panic!("expected lambda argument");
        };
        assert_eq!(params, &[String::from("x"), String::from("y")]);
    }

    #[test]
    fn test_lambda_rejects_non_identifier_params() {
        let dialect = duckdb();
        let parse = Parser::new("SELECT f(1 -> x) FROM t", &dialect).parse();
        assert!(parse
            .diagnostics
            .iter()
            .any(|d| d.message.contains("lambda parameters")));
    }

    #[test]
    fn test_list_literal_and_index() {
        let Expr::Index { target, op, .. } = first_expr("SELECT [1, 2, 3][2] FROM t") else {
            panic!("expected index expression");
        };
        let Expr::List { elements, .. } = *target else {
            panic!("expected list target");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(op, IndexOp::Element(_)));
    }

    #[test]
    fn test_slice_bounds_optional() {
        let Expr::Index { op, .. } = first_expr("SELECT l[2:] FROM t") else {
            panic!("expected index expression");
        };
        let IndexOp::Slice { start, stop } = op else {
            panic!("expected slice");
        };
        assert!(start.is_some());
        assert!(stop.is_none());
    }

    #[test]
    fn test_struct_literal_keys_unquoted() {
        let Expr::Struct { fields, .. } = first_expr("SELECT {'a': 1, 'b': x + 1} FROM t") else {
            panic!("expected struct literal");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "a");
        assert_eq!(fields[1].name, "b");
    }

    #[test]
    fn test_integer_division_symbol() {
        let Expr::Binary { op, .. } = first_expr("SELECT a // b FROM t") else {
            panic!("expected binary expression");
        };
        assert_eq!(op.name(), "//");
        assert!(op.is_dynamic());
    }

    #[test]
    fn test_ilike_predicate() {
        let parse = parse_clean("SELECT a FROM t WHERE name NOT ILIKE '%duck%'");
        let Some(Expr::Like { not, op, .. }) = &parse.stmt.body.left.where_clause else {
            panic!("expected LIKE-family predicate");
        };
        assert!(*not);
        assert_eq!(op.name(), "ILIKE");
    }

    #[test]
    fn test_double_colon_cast_chain() {
        let Expr::Cast { expr, type_name, .. } = first_expr("SELECT id::VARCHAR FROM t") else {
            panic!("expected cast");
        };
        assert_eq!(type_name, "VARCHAR");
        assert!(matches!(*expr, Expr::ColumnRef { .. }));
    }

    #[test]
    fn test_function_classification() {
        let d = duckdb();
        assert!(d.is_aggregate_function("arg_max"));
        assert!(d.is_aggregate_function("sum"));
        assert!(d.is_table_function("read_csv"));
        assert!(d.is_window_function("row_number"));
    }
}
