//! The `::` cast operator, shared by the dialects that support it.

use argot_sql_core::ast::Expr;
use argot_sql_core::lexer::TokenType;
use argot_sql_core::parser::{ClauseCtx, Diagnostic};

/// Parses `expr::type`, producing the same node `CAST(expr AS type)`
/// builds, so downstream passes see one cast shape.
///
/// The type here is a single word plus an optional argument list.
/// Multiword names (`DOUBLE PRECISION`) need the CAST form: a greedy
/// word scan after `::` would swallow a following bare alias.
pub(crate) fn double_colon_cast(
    ctx: &mut ClauseCtx<'_, '_>,
    left: Expr,
) -> Result<Expr, Diagnostic> {
    let start = left.span().start;
    ctx.advance();
    let mut type_name = ctx.parse_identifier("type name after `::`")?;
    if ctx.eat(TokenType::LPAREN) {
        type_name.push('(');
        loop {
            let tok = ctx.cur().clone();
            if tok.ty == TokenType::NUMBER || tok.ty == TokenType::IDENT {
                ctx.advance();
                type_name.push_str(&tok.text);
            } else {
                return Err(ctx.error_here(format!("expected a type argument, found {}", tok.ty)));
            }
            if ctx.eat(TokenType::COMMA) {
                type_name.push_str(", ");
                continue;
            }
            break;
        }
        ctx.expect(TokenType::RPAREN)?;
        type_name.push(')');
    }
    Ok(Expr::Cast {
        expr: Box::new(left),
        type_name,
        span: ctx.span_from(start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot_sql_core::ast::SelectItemKind;
    use argot_sql_core::dialect::{ansi, Dialect, DialectBuilder, DialectConfig, Precedence};
    use argot_sql_core::parser::parse_sql;

    fn probe() -> Dialect {
        DialectBuilder::new(DialectConfig::named("cast-probe"))
            .inherit(&ansi())
            .infix(TokenType::DOUBLE_COLON, Precedence::Postfix, double_colon_cast)
            .build()
    }

    fn first_expr(src: &str) -> Expr {
        let dialect = probe();
        let parse = parse_sql(src, &dialect).unwrap();
        match &parse.stmt.body.left.items[0].kind {
            SelectItemKind::Expr { expr, .. } => expr.clone(),
            other => panic!("expected an expression item, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_cast() {
        let Expr::Cast { type_name, .. } = first_expr("SELECT x::uuid FROM t") else {
            panic!("expected cast");
        };
        assert_eq!(type_name, "uuid");
    }

    #[test]
    fn test_cast_with_arguments() {
        let Expr::Cast { type_name, .. } = first_expr("SELECT total::DECIMAL(10, 2) FROM t") else {
            panic!("expected cast");
        };
        assert_eq!(type_name, "DECIMAL(10, 2)");
    }

    #[test]
    fn test_cast_does_not_swallow_alias() {
        let dialect = probe();
        let parse = parse_sql("SELECT x::INTEGER converted FROM t", &dialect).unwrap();
        let SelectItemKind::Expr { alias, .. } = &parse.stmt.body.left.items[0].kind else {
            panic!("expected an expression item");
        };
        assert_eq!(alias.as_deref(), Some("converted"));
    }

    #[test]
    fn test_cast_binds_tighter_than_arithmetic() {
        let Expr::Binary { left, .. } = first_expr("SELECT a::BIGINT + 1 FROM t") else {
            panic!("expected addition at the top");
        };
        assert!(matches!(*left, Expr::Cast { .. }));
    }
}
