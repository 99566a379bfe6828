//! Statement-level nodes.

use crate::lexer::Span;

use super::expression::{Expr, WindowSpec};
use super::table_ref::FromClause;
use super::CommentSet;

/// The root of a parsed statement: an optional WITH prologue and the
/// select body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStmt {
    pub with: Option<WithClause>,
    pub body: SelectBody,
    pub span: Span,
    pub comments: CommentSet,
}

/// `WITH [RECURSIVE] cte (, cte)*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
    pub span: Span,
    pub comments: CommentSet,
}

/// One common table expression: `name AS (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cte {
    pub name: String,
    pub query: SelectStmt,
    pub span: Span,
    pub comments: CommentSet,
}

/// A set-operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl SetOpKind {
    /// Returns the keyword for this operation.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// The operator joining two arms of a compound select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOp {
    pub kind: SetOpKind,
    pub all: bool,
    /// `UNION BY NAME`: match columns by name instead of position.
    pub by_name: bool,
}

/// A select body: one core, optionally combined with further bodies.
///
/// The chain is right-recursive, so `a UNION b UNION c` nests as
/// `a UNION (b UNION c)`. `op` and `right` are set together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectBody {
    pub left: SelectCore,
    pub op: Option<SetOp>,
    pub right: Option<Box<SelectBody>>,
    pub span: Span,
    pub comments: CommentSet,
}

impl SelectBody {
    /// Wraps a single core with no set operation.
    #[must_use]
    pub fn single(core: SelectCore) -> Self {
        let span = core.span;
        Self {
            left: core,
            op: None,
            right: None,
            span,
            comments: CommentSet::default(),
        }
    }

    /// Returns true if this body is a compound select.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        self.op.is_some()
    }
}

/// One `SELECT ... [FROM ...] clauses...` block.
///
/// Clause results land in these fields slot-by-slot; `extensions` is the
/// catch-all bucket for dialect-private clauses with no named field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectCore {
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    /// `GROUP BY ALL`
    pub group_by_all: bool,
    pub having: Option<Expr>,
    pub windows: Vec<WindowDef>,
    pub qualify: Option<Expr>,
    pub order_by: Vec<OrderByItem>,
    /// `ORDER BY ALL [DESC]`
    pub order_by_all: bool,
    pub order_by_all_desc: bool,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub fetch: Option<Expr>,
    pub extensions: Vec<ClauseExt>,
    pub span: Span,
    pub comments: CommentSet,
}

/// What a select item selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItemKind {
    /// Bare `*`.
    Star,
    /// `table.*`
    TableStar { table: String },
    /// An expression with an optional alias.
    Expr { expr: Expr, alias: Option<String> },
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub kind: SelectItemKind,
    /// Star modifiers in application order (`* EXCLUDE (..) RENAME (..)`).
    pub modifiers: Vec<StarModifier>,
    pub span: Span,
    pub comments: CommentSet,
}

impl SelectItem {
    /// Returns true if this item selects a star (bare or table-qualified).
    #[must_use]
    pub const fn is_star(&self) -> bool {
        matches!(
            self.kind,
            SelectItemKind::Star | SelectItemKind::TableStar { .. }
        )
    }
}

/// `REPLACE (expr AS name)` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceItem {
    pub expr: Expr,
    pub alias: String,
    pub span: Span,
}

/// `RENAME (old AS new)` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameItem {
    pub from: String,
    pub to: String,
    pub span: Span,
}

/// A modifier trailing a star item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarModifier {
    /// `EXCLUDE (a, b)`
    Exclude { columns: Vec<String>, span: Span },
    /// `REPLACE (expr AS name, ...)`
    Replace { items: Vec<ReplaceItem>, span: Span },
    /// `RENAME (old AS new, ...)`
    Rename { items: Vec<RenameItem>, span: Span },
}

impl StarModifier {
    /// Returns the source span this modifier covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Exclude { span, .. }
            | Self::Replace { span, .. }
            | Self::Rename { span, .. } => *span,
        }
    }
}

/// One `ORDER BY` entry.
///
/// `asc`/`nulls_first` are `None` when unwritten so the formatter does not
/// invent direction keywords the author left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub asc: Option<bool>,
    pub nulls_first: Option<bool>,
    pub span: Span,
}

/// One named window from a `WINDOW` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDef {
    pub name: String,
    pub spec: WindowSpec,
    pub span: Span,
}

/// The parsed result of a dialect-private clause, kept generic: the
/// display keyword plus the expressions the handler collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseExt {
    pub keyword: String,
    pub exprs: Vec<Expr>,
    pub span: Span,
}
