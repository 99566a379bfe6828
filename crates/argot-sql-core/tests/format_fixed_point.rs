//! Formatting stability: rendered output re-parses clean and renders to
//! the same text again, across the printer's paths. Comment
//! reattachment goes through the same check with the decorated tree.

mod common;
use common::*;

use argot_sql_core::dialect::ansi;
use argot_sql_core::{format, format_with_comments, Parser};

#[test]
fn literals_and_operators() {
    round_trip("SELECT 1");
    round_trip("SELECT -a + +b FROM t");
    round_trip("SELECT NOT a FROM t");
    round_trip("SELECT a || b || c FROM t");
    round_trip("SELECT a * (b + c) / 2 FROM t");
}

#[test]
fn select_list_shapes() {
    round_trip("SELECT * FROM t");
    round_trip("SELECT t.* FROM t");
    round_trip("SELECT DISTINCT a, b FROM t");
    round_trip("SELECT a AS x, b y FROM t AS u");
    round_trip("SELECT \"mixed Case\" FROM t");
}

#[test]
fn predicates() {
    round_trip("SELECT a FROM t WHERE a = 1 AND b <> 2 OR c > 3");
    round_trip("SELECT a FROM t WHERE a IS NOT NULL AND b IS TRUE");
    round_trip("SELECT a FROM t WHERE name NOT LIKE 'J%'");
    round_trip("SELECT a FROM t WHERE id IN (1, 2, 3)");
    round_trip("SELECT a FROM t WHERE id NOT IN (SELECT id FROM u)");
    round_trip("SELECT a FROM t WHERE x BETWEEN 1 AND 10");
    round_trip("SELECT a FROM t WHERE (a, b) = (1, 2)");
}

#[test]
fn case_cast_and_calls() {
    round_trip("SELECT CASE WHEN a THEN 1 ELSE 0 END FROM t");
    round_trip("SELECT CASE a WHEN 1 THEN 'one' END FROM t");
    round_trip("SELECT CAST(a AS DECIMAL(10, 2)) FROM t");
    round_trip("SELECT COUNT(DISTINCT a) FILTER (WHERE b > 0) FROM t");
    round_trip(
        "SELECT SUM(a) OVER (PARTITION BY b ORDER BY c ROWS BETWEEN 2 PRECEDING AND CURRENT ROW) \
         FROM t",
    );
    round_trip("SELECT a FROM t WINDOW w AS (ORDER BY a RANGE UNBOUNDED PRECEDING)");
}

#[test]
fn sources_and_joins() {
    round_trip("SELECT a FROM s.t");
    round_trip("SELECT a FROM c.s.t");
    round_trip("SELECT a FROM t1 JOIN t2 ON t1.id = t2.id LEFT JOIN t3 USING (id)");
    round_trip("SELECT a FROM t1, t2 WHERE t1.id = t2.id");
    round_trip("SELECT a FROM t NATURAL JOIN u");
    round_trip("SELECT a FROM (SELECT b FROM u) AS sub");
    round_trip("SELECT a FROM t, LATERAL (SELECT b FROM u WHERE u.t_id = t.id) AS l");
}

#[test]
fn subquery_expressions() {
    round_trip("SELECT (SELECT MAX(b) FROM u) AS best FROM t");
    round_trip("SELECT EXISTS (SELECT 1 FROM u) FROM t");
    round_trip("SELECT a FROM t WHERE NOT EXISTS (SELECT 1 FROM u WHERE u.id = t.id)");
}

#[test]
fn trailing_clauses() {
    round_trip("SELECT a FROM t GROUP BY a HAVING COUNT(*) > 1");
    round_trip("SELECT a FROM t ORDER BY a DESC NULLS FIRST, b");
    round_trip("SELECT a FROM t LIMIT 10 OFFSET 5");
    // NEXT normalizes to FIRST on the first render.
    round_trip("SELECT a FROM t FETCH NEXT 3 ROWS ONLY");
}

#[test]
fn compound_and_with() {
    round_trip("WITH x AS (SELECT 1), y AS (SELECT 2) SELECT * FROM x, y");
    round_trip("WITH RECURSIVE r AS (SELECT 1 UNION ALL SELECT n + 1 FROM r) SELECT * FROM r");
    round_trip("SELECT a FROM x UNION SELECT a FROM y INTERSECT SELECT a FROM z");
    round_trip("SELECT a FROM x EXCEPT ALL SELECT a FROM y");
    round_trip("SELECT a, b FROM x UNION BY NAME SELECT b, a FROM y");
}

#[test]
fn template_macros_and_placeholders() {
    round_trip("SELECT {{ config(materialized='table') }} FROM {{ ref('stg') }}");
    round_trip("SELECT ? FROM t WHERE a = ?");
}

#[test]
fn canonical_layout_golden() {
    assert_eq!(
        render(
            "SELECT region, SUM(total) AS revenue FROM sales \
             WHERE shipped = TRUE AND region <> 'test' \
             GROUP BY region HAVING SUM(total) > 0 \
             ORDER BY revenue DESC LIMIT 10"
        ),
        "SELECT\n  region,\n  SUM(total) AS revenue\n\
         FROM sales\n\
         WHERE\n  shipped = TRUE AND region <> 'test'\n\
         GROUP BY\n  region\n\
         HAVING\n  SUM(total) > 0\n\
         ORDER BY\n  revenue DESC\n\
         LIMIT 10\n"
    );
}

#[test]
fn comments_reattach_by_position() {
    let dialect = ansi();
    let src = "-- daily rollup\nSELECT\n  id, -- pk\n  SUM(val) AS total\nFROM events -- fact table\nWHERE active = TRUE";
    let parse = Parser::new(src, &dialect).parse();
    assert!(parse.diagnostics.is_empty());
    let out = format_with_comments(&parse.stmt, &parse.comments, &dialect);
    assert_eq!(
        out,
        "-- daily rollup\nSELECT\n  id, -- pk\n  SUM(val) AS total\nFROM events -- fact table\nWHERE\n  active = TRUE\n"
    );
}

#[test]
fn decorated_output_is_stable() {
    let dialect = ansi();
    let src = "/* header */ SELECT a, b -- tail\nFROM t";
    let first = Parser::new(src, &dialect).parse();
    assert!(first.diagnostics.is_empty());
    let decorated = format_with_comments(&first.stmt, &first.comments, &dialect);

    let second = Parser::new(&decorated, &dialect).parse();
    assert!(
        second.diagnostics.is_empty(),
        "decorated output does not re-parse: {decorated}"
    );
    let redecorated = format_with_comments(&second.stmt, &second.comments, &dialect);
    assert_eq!(decorated, redecorated);
}

#[test]
fn plain_format_drops_comments() {
    let dialect = ansi();
    let src = "SELECT a -- note\nFROM t";
    let parse = Parser::new(src, &dialect).parse();
    let out = format(&parse.stmt, &dialect);
    assert!(!out.contains("note"));
    assert_eq!(out, "SELECT\n  a\nFROM t\n");
}
