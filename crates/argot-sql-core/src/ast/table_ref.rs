//! FROM-clause nodes: table references and joins.

use crate::lexer::Span;

use super::expression::Expr;
use super::statement::SelectStmt;
use super::CommentSet;

/// The `FROM` clause: a base source plus zero or more joins applied in
/// source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromClause {
    pub source: TableRef,
    pub joins: Vec<Join>,
    pub span: Span,
    pub comments: CommentSet,
}

/// One join step.
///
/// `join_type` is string-valued ("INNER", "LEFT SEMI", "ASOF", ...) because
/// dialects declare join types as data; a closed enum would put the core
/// back in the business of knowing every vendor's joins. At most one of
/// `condition`/`using_columns` is set; a NATURAL join carries neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub join_type: String,
    pub natural: bool,
    /// True for the comma form (`FROM a, b`), which is a cross join that
    /// prints back as a comma.
    pub implicit: bool,
    pub right: TableRef,
    pub condition: Option<Expr>,
    pub using_columns: Option<Vec<String>>,
    pub span: Span,
    pub comments: CommentSet,
}

/// One group of source columns inside an UNPIVOT `IN` list, with an
/// optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpivotInGroup {
    pub columns: Vec<String>,
    pub alias: Option<String>,
    pub span: Span,
}

/// A table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// A possibly qualified table name.
    Named {
        catalog: Option<String>,
        schema: Option<String>,
        name: String,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
    /// `(SELECT ...) [AS] alias`
    Derived {
        subquery: Box<SelectStmt>,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
    /// `LATERAL (SELECT ...) [AS] alias`
    Lateral {
        subquery: Box<SelectStmt>,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
    /// A `{{ ... }}` template-macro in table position, stored verbatim.
    Macro {
        raw: String,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
    /// `source PIVOT (aggs FOR col IN (values | *)) [alias]`
    Pivot {
        source: Box<TableRef>,
        aggregates: Vec<Expr>,
        for_column: String,
        in_values: Vec<Expr>,
        /// True for `IN (*)`; `in_values` is empty in that case.
        in_star: bool,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
    /// `source UNPIVOT (value-cols FOR name-col IN (groups)) [alias]`
    Unpivot {
        source: Box<TableRef>,
        value_columns: Vec<String>,
        name_column: String,
        in_groups: Vec<UnpivotInGroup>,
        alias: Option<String>,
        span: Span,
        comments: CommentSet,
    },
}

impl TableRef {
    /// Returns the source span this reference covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Named { span, .. }
            | Self::Derived { span, .. }
            | Self::Lateral { span, .. }
            | Self::Macro { span, .. }
            | Self::Pivot { span, .. }
            | Self::Unpivot { span, .. } => *span,
        }
    }

    /// Returns the attached comments.
    #[must_use]
    pub const fn comments(&self) -> &CommentSet {
        match self {
            Self::Named { comments, .. }
            | Self::Derived { comments, .. }
            | Self::Lateral { comments, .. }
            | Self::Macro { comments, .. }
            | Self::Pivot { comments, .. }
            | Self::Unpivot { comments, .. } => comments,
        }
    }

    /// Mutable access for the comment-decoration pass.
    pub fn comments_mut(&mut self) -> &mut CommentSet {
        match self {
            Self::Named { comments, .. }
            | Self::Derived { comments, .. }
            | Self::Lateral { comments, .. }
            | Self::Macro { comments, .. }
            | Self::Pivot { comments, .. }
            | Self::Unpivot { comments, .. } => comments,
        }
    }

    /// Returns the alias, if one was written.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Named { alias, .. }
            | Self::Derived { alias, .. }
            | Self::Lateral { alias, .. }
            | Self::Macro { alias, .. }
            | Self::Pivot { alias, .. }
            | Self::Unpivot { alias, .. } => alias.as_deref(),
        }
    }
}

impl Join {
    /// Returns true if this join may not take an ON or USING clause
    /// (NATURAL joins and condition-free types like CROSS).
    #[must_use]
    pub fn is_condition_free(&self) -> bool {
        self.natural || (self.condition.is_none() && self.using_columns.is_none())
    }
}
