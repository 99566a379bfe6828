//! Expression nodes.
//!
//! Expressions are a closed sum type: every variant carries the source span
//! it covers, and downstream passes match exhaustively. Dialect-extension
//! syntax (lambdas, struct literals, list literals, indexing) has first-class
//! variants here even though only extension handlers produce them; the
//! formatter must be able to print whatever any dialect can parse.

use crate::lexer::{Span, TokenType};

use super::statement::{OrderByItem, SelectStmt};

/// The class of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Integer, decimal, or exponent-form number.
    Number,
    /// Single-quoted string, quotes included in the text.
    String,
    /// `TRUE` or `FALSE`.
    Bool,
    /// `NULL`.
    Null,
}

/// An element access or slice following a `[`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    /// `expr[i]`
    Element(Box<Expr>),
    /// `expr[a:b]`, either bound optional.
    Slice {
        start: Option<Box<Expr>>,
        stop: Option<Box<Expr>>,
    },
}

/// One `key: value` entry of a struct literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field name, unquoted.
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// The body of an `IN` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InSet {
    /// `IN (a, b, c)`
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`
    Subquery(Box<SelectStmt>),
}

/// One `WHEN cond THEN result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWhen {
    pub condition: Expr,
    pub result: Expr,
    pub span: Span,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A possibly table-qualified column reference.
    ColumnRef {
        table: Option<String>,
        column: String,
        span: Span,
    },
    /// A literal with its text as written.
    Literal {
        kind: LiteralKind,
        text: String,
        span: Span,
    },
    /// A binary operation. The operator is a token tag so dialect symbols
    /// (`//`, `->` when unclaimed) print back with their registered name.
    Binary {
        left: Box<Expr>,
        op: TokenType,
        right: Box<Expr>,
        span: Span,
    },
    /// A prefix operation (`-x`, `+x`, `NOT x`).
    Unary {
        op: TokenType,
        operand: Box<Expr>,
        span: Span,
    },
    /// A function call.
    FuncCall {
        name: String,
        distinct: bool,
        /// `true` for `f(*)`; `args` is empty in that case.
        star: bool,
        args: Vec<Expr>,
        filter: Option<Box<Expr>>,
        window: Option<WindowSpec>,
        span: Span,
    },
    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    Case {
        operand: Option<Box<Expr>>,
        whens: Vec<CaseWhen>,
        else_expr: Option<Box<Expr>>,
        span: Span,
    },
    /// `CAST(expr AS type)`
    Cast {
        expr: Box<Expr>,
        type_name: String,
        span: Span,
    },
    /// `expr [NOT] IN (values | subquery)`
    In {
        expr: Box<Expr>,
        not: bool,
        set: InSet,
        span: Span,
    },
    /// `expr [NOT] BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        not: bool,
        low: Box<Expr>,
        high: Box<Expr>,
        span: Span,
    },
    /// `expr IS [NOT] NULL`
    IsNull {
        expr: Box<Expr>,
        not: bool,
        span: Span,
    },
    /// `expr IS [NOT] TRUE|FALSE`
    IsBool {
        expr: Box<Expr>,
        not: bool,
        value: bool,
        span: Span,
    },
    /// `expr [NOT] LIKE pattern` and dialect variants (`ILIKE`, `GLOB`).
    /// The operator token distinguishes them while sharing one shape.
    Like {
        expr: Box<Expr>,
        not: bool,
        op: TokenType,
        pattern: Box<Expr>,
        span: Span,
    },
    /// A parenthesized expression, preserved for faithful reprinting.
    Paren { inner: Box<Expr>, span: Span },
    /// `*` or `table.*` in expression position (function arguments).
    Star {
        table: Option<String>,
        span: Span,
    },
    /// `(SELECT ...)` in expression position.
    Subquery { stmt: Box<SelectStmt>, span: Span },
    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        not: bool,
        stmt: Box<SelectStmt>,
        span: Span,
    },
    /// A `{{ ... }}` template-macro literal, stored verbatim with its
    /// delimiters.
    Macro { raw: String, span: Span },
    /// A bind parameter, `?` or `$1` per the dialect's placeholder style.
    Placeholder { text: String, span: Span },
    /// `x -> body` or `(x, y) -> body` (dialect extension).
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
        span: Span,
    },
    /// `{'a': 1, 'b': 2}` (dialect extension).
    Struct { fields: Vec<StructField>, span: Span },
    /// `[1, 2, 3]` (dialect extension).
    List { elements: Vec<Expr>, span: Span },
    /// `expr[i]` or `expr[a:b]` (dialect extension).
    Index {
        target: Box<Expr>,
        op: IndexOp,
        span: Span,
    },
}

impl Expr {
    /// Returns the source span this expression covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::ColumnRef { span, .. }
            | Self::Literal { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::FuncCall { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::In { span, .. }
            | Self::Between { span, .. }
            | Self::IsNull { span, .. }
            | Self::IsBool { span, .. }
            | Self::Like { span, .. }
            | Self::Paren { span, .. }
            | Self::Star { span, .. }
            | Self::Subquery { span, .. }
            | Self::Exists { span, .. }
            | Self::Macro { span, .. }
            | Self::Placeholder { span, .. }
            | Self::Lambda { span, .. }
            | Self::Struct { span, .. }
            | Self::List { span, .. }
            | Self::Index { span, .. } => *span,
        }
    }

    /// Returns true for the comma chain produced by a parenthesized list,
    /// e.g. the `(x, y)` ahead of a lambda arrow.
    #[must_use]
    pub fn is_comma_chain(&self) -> bool {
        matches!(
            self,
            Self::Binary {
                op: TokenType::COMMA,
                ..
            }
        )
    }
}

/// A window specification: either a reference to a named window or an
/// inline `(PARTITION BY .. ORDER BY .. frame)` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Set when the spec is `OVER name`.
    pub name: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub frame: Option<FrameSpec>,
    pub span: Span,
}

/// The unit a window frame counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Rows,
    Range,
    Groups,
}

impl FrameKind {
    /// Returns the keyword for this frame kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// One endpoint of a window frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

/// A window frame clause.
///
/// `end` is `None` for the single-bound form (`ROWS UNBOUNDED PRECEDING`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    pub kind: FrameKind,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
    pub span: Span,
}
