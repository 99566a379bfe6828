//! Position-based comment reattachment.
//!
//! The printer emits comments only at line boundaries, so decoration
//! targets the nodes that start a line in the output: statements, WITH
//! and its CTEs, select bodies and cores, select items, FROM clauses and
//! explicit joins. A comment becomes *trailing* on the node ending
//! nearest before it on its own source line; failing that it becomes
//! *leading* on the next node that starts at or after it. Comments past
//! every node land at the statement tail so they survive the round trip.
//! Expression-level subqueries are not descended into; a comment inside
//! one attaches to whatever enclosing construct shares its line.
//!
//! The pass runs two mirrored walks over the tree in printing order: an
//! immutable one enumerating candidate spans, then a mutable one counting
//! the same nodes and delivering each comment to its chosen index.

use crate::ast::{CommentSet, SelectBody, SelectCore, SelectStmt, TableRef};
use crate::lexer::{Comment, Span};

pub(super) fn decorate(stmt: &mut SelectStmt, comments: &[Comment]) {
    let mut spans = Vec::new();
    collect_stmt(stmt, &mut spans);

    let mut plan: Vec<Vec<PlannedComment>> = vec![Vec::new(); spans.len()];
    let mut tail = Vec::new();
    for comment in comments {
        match place(&spans, comment) {
            Placement::Trailing(i) => plan[i].push(PlannedComment {
                trailing: true,
                comment: comment.clone(),
            }),
            Placement::Leading(i) => plan[i].push(PlannedComment {
                trailing: false,
                comment: comment.clone(),
            }),
            Placement::Tail => tail.push(comment.clone()),
        }
    }

    let mut apply = Apply { plan, next: 0 };
    apply_stmt(stmt, &mut apply);
    stmt.comments.trailing.extend(tail);
}

enum Placement {
    Trailing(usize),
    Leading(usize),
    Tail,
}

fn place(spans: &[Span], comment: &Comment) -> Placement {
    let preceding = spans
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.end.line == comment.span.start.line && s.end.offset <= comment.span.start.offset
        })
        .max_by_key(|(i, s)| (s.end.offset, *i));
    if let Some((i, _)) = preceding {
        return Placement::Trailing(i);
    }

    let following = spans
        .iter()
        .enumerate()
        .filter(|(_, s)| s.start.offset >= comment.span.end.offset)
        .min_by_key(|(i, s)| (s.start.offset, *i));
    match following {
        Some((i, _)) => Placement::Leading(i),
        None => Placement::Tail,
    }
}

#[derive(Clone)]
struct PlannedComment {
    trailing: bool,
    comment: Comment,
}

struct Apply {
    plan: Vec<Vec<PlannedComment>>,
    next: usize,
}

impl Apply {
    fn node(&mut self, comments: &mut CommentSet) {
        let idx = self.next;
        self.next += 1;
        if let Some(planned) = self.plan.get_mut(idx) {
            for entry in planned.drain(..) {
                if entry.trailing {
                    comments.trailing.push(entry.comment);
                } else {
                    comments.leading.push(entry.comment);
                }
            }
        }
    }
}

// The collect_* and apply_* pairs must visit nodes in the same order;
// `Apply::node` relies on the counter lining up with the span list.

fn collect_stmt(stmt: &SelectStmt, out: &mut Vec<Span>) {
    out.push(stmt.span);
    if let Some(with) = &stmt.with {
        out.push(with.span);
        for cte in &with.ctes {
            out.push(cte.span);
            collect_stmt(&cte.query, out);
        }
    }
    collect_body(&stmt.body, out);
}

fn collect_body(body: &SelectBody, out: &mut Vec<Span>) {
    out.push(body.span);
    collect_core(&body.left, out);
    if let Some(right) = &body.right {
        collect_body(right, out);
    }
}

fn collect_core(core: &SelectCore, out: &mut Vec<Span>) {
    out.push(core.span);
    for item in &core.items {
        out.push(item.span);
    }
    if let Some(from) = &core.from {
        out.push(from.span);
        collect_table(&from.source, out);
        for join in &from.joins {
            if !join.implicit {
                out.push(join.span);
            }
            collect_table(&join.right, out);
        }
    }
}

fn collect_table(table: &TableRef, out: &mut Vec<Span>) {
    match table {
        TableRef::Derived { subquery, .. } | TableRef::Lateral { subquery, .. } => {
            collect_stmt(subquery, out);
        }
        TableRef::Pivot { source, .. } | TableRef::Unpivot { source, .. } => {
            collect_table(source, out);
        }
        TableRef::Named { .. } | TableRef::Macro { .. } => {}
    }
}

fn apply_stmt(stmt: &mut SelectStmt, apply: &mut Apply) {
    apply.node(&mut stmt.comments);
    if let Some(with) = &mut stmt.with {
        apply.node(&mut with.comments);
        for cte in &mut with.ctes {
            apply.node(&mut cte.comments);
            apply_stmt(&mut cte.query, apply);
        }
    }
    apply_body(&mut stmt.body, apply);
}

fn apply_body(body: &mut SelectBody, apply: &mut Apply) {
    apply.node(&mut body.comments);
    apply_core(&mut body.left, apply);
    if let Some(right) = &mut body.right {
        apply_body(right, apply);
    }
}

fn apply_core(core: &mut SelectCore, apply: &mut Apply) {
    apply.node(&mut core.comments);
    for item in &mut core.items {
        apply.node(&mut item.comments);
    }
    if let Some(from) = &mut core.from {
        apply.node(&mut from.comments);
        apply_table(&mut from.source, apply);
        for join in &mut from.joins {
            if !join.implicit {
                apply.node(&mut join.comments);
            }
            apply_table(&mut join.right, apply);
        }
    }
}

fn apply_table(table: &mut TableRef, apply: &mut Apply) {
    match table {
        TableRef::Derived { subquery, .. } | TableRef::Lateral { subquery, .. } => {
            apply_stmt(subquery, apply);
        }
        TableRef::Pivot { source, .. } | TableRef::Unpivot { source, .. } => {
            apply_table(source, apply);
        }
        TableRef::Named { .. } | TableRef::Macro { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::ansi;
    use crate::format::format_with_comments;
    use crate::parser::Parser;

    fn fmt(src: &str) -> String {
        let dialect = ansi();
        let parse = Parser::new(src, &dialect).parse();
        assert!(
            parse.diagnostics.is_empty(),
            "diagnostics for {src:?}: {:?}",
            parse.diagnostics
        );
        format_with_comments(&parse.stmt, &parse.comments, &dialect)
    }

    #[test]
    fn test_header_comment_leads_the_statement() {
        let out = fmt("-- daily rollup\nSELECT a FROM t");
        assert!(out.starts_with("-- daily rollup\nSELECT\n"));
    }

    #[test]
    fn test_item_comment_trails_its_line() {
        let out = fmt("SELECT a, -- first\n  b FROM t");
        assert!(out.contains("  a, -- first\n"));
        assert!(out.contains("  b\n"));
    }

    #[test]
    fn test_comment_before_item_leads_it() {
        let out = fmt("SELECT\n  -- label\n  a FROM t");
        assert!(out.contains("SELECT\n  -- label\n  a\n"));
    }

    #[test]
    fn test_from_line_comment_trails_from() {
        let out = fmt("SELECT a FROM t -- source table");
        assert!(out.contains("FROM t -- source table\n"));
    }

    #[test]
    fn test_join_comment_stays_with_join() {
        let out = fmt("SELECT a FROM t\n-- enrich\nJOIN u ON t.id = u.id");
        assert!(out.contains("\n-- enrich\nINNER JOIN u ON t.id = u.id\n"));
    }

    #[test]
    fn test_block_comment_survives() {
        let out = fmt("/* header */ SELECT a FROM t");
        assert!(out.starts_with("/* header */\nSELECT\n"));
    }

    #[test]
    fn test_final_comment_lands_at_tail() {
        let out = fmt("SELECT a FROM t\n-- done");
        assert!(out.ends_with("FROM t\n-- done\n"));
    }

    #[test]
    fn test_subquery_interior_comment_attaches_to_shared_line() {
        let out = fmt("SELECT a FROM t WHERE EXISTS (SELECT 1 -- probe\n FROM u)");
        assert!(out.contains("FROM t -- probe\n"));
    }

    #[test]
    fn test_decorated_output_reparses_clean() {
        let dialect = ansi();
        let out = fmt("-- top\nSELECT a, -- one\n  b FROM t -- src\nWHERE a > 0");
        let again = Parser::new(&out, &dialect).parse();
        assert!(again.diagnostics.is_empty(), "{:?}", again.diagnostics);
        assert_eq!(again.comments.len(), 3);
    }
}
