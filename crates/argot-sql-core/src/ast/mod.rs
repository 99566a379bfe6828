//! The abstract syntax tree.
//!
//! Nodes are tagged variants owned exclusively by their parent; consumers
//! borrow and match exhaustively. Statement-level nodes carry a
//! [`CommentSet`] that the formatter's decoration pass fills in;
//! expression nodes carry only their span.

mod expression;
mod statement;
mod table_ref;

pub use expression::{
    CaseWhen, Expr, FrameBound, FrameKind, FrameSpec, InSet, IndexOp, LiteralKind, StructField,
    WindowSpec,
};
pub use statement::{
    ClauseExt, Cte, OrderByItem, RenameItem, ReplaceItem, SelectBody, SelectCore, SelectItem,
    SelectItemKind, SelectStmt, SetOp, SetOpKind, StarModifier, WindowDef, WithClause,
};
pub use table_ref::{FromClause, Join, TableRef, UnpivotInGroup};

use crate::lexer::Comment;

/// Comments attached to a node by the formatter's decoration pass.
///
/// Leading comments end before the node starts, on an earlier line;
/// trailing comments start after the node ends, on the same line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentSet {
    pub leading: Vec<Comment>,
    pub trailing: Vec<Comment>,
}

impl CommentSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            leading: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Returns true if no comments are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}
