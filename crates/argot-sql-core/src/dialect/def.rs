//! Dialect extension-point definitions.
//!
//! Every way a dialect can influence parsing is a value in one of these
//! tables: clause definitions, operator entries, join types, star-modifier
//! and FROM-item hooks, prefix handlers. The parser looks up by token and
//! dispatches through the stored closure; it has no hardcoded knowledge of
//! any dialect-specific construct.

use std::fmt;
use std::sync::Arc;

use crate::ast::{ClauseExt, Expr, OrderByItem, StarModifier, TableRef, WindowDef};
use crate::lexer::TokenType;
use crate::parser::{ClauseCtx, Diagnostic};

/// Destination field on `SelectCore` for a clause handler's result.
///
/// Closed on purpose: new dialect clauses reuse a slot (or land in
/// `Extensions`), they do not grow the statement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseSlot {
    Where,
    GroupBy,
    Having,
    Window,
    OrderBy,
    Limit,
    Offset,
    Qualify,
    Fetch,
    /// Catch-all bucket for dialect-private clauses.
    Extensions,
}

/// What a clause handler produced.
///
/// Slot assignment is table-driven on the (slot, value) pair, so a handler
/// never touches `SelectCore` directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    /// A single expression (WHERE, HAVING, QUALIFY, LIMIT, OFFSET, FETCH).
    Expr(Expr),
    /// An expression list (GROUP BY).
    Exprs(Vec<Expr>),
    /// Ordering items (ORDER BY).
    OrderBy(Vec<OrderByItem>),
    /// Named windows (WINDOW).
    Windows(Vec<WindowDef>),
    /// The `ALL` marker for `GROUP BY ALL` / `ORDER BY ALL [DESC]`.
    All { desc: bool },
    /// A generic extension-clause result.
    Extension(ClauseExt),
}

/// Handler invoked after the parser consumes a clause's trigger token.
pub type ClauseHandler =
    Arc<dyn Fn(&mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> + Send + Sync>;

/// Prefix expression handler, consulted before built-in primary parsing.
pub type PrefixHandler =
    Arc<dyn Fn(&mut ClauseCtx<'_, '_>) -> Result<Expr, Diagnostic> + Send + Sync>;

/// Infix expression handler; receives the already-parsed left operand.
pub type InfixHandler =
    Arc<dyn Fn(&mut ClauseCtx<'_, '_>, Expr) -> Result<Expr, Diagnostic> + Send + Sync>;

/// Star-modifier handler, invoked after a star select item.
pub type StarModifierHandler =
    Arc<dyn Fn(&mut ClauseCtx<'_, '_>) -> Result<StarModifier, Diagnostic> + Send + Sync>;

/// FROM-item extension handler; receives the base table reference.
pub type FromItemHandler =
    Arc<dyn Fn(&mut ClauseCtx<'_, '_>, TableRef) -> Result<TableRef, Diagnostic> + Send + Sync>;

/// One clause the dialect understands.
#[derive(Clone)]
pub struct ClauseDef {
    /// Trigger token; the parser consumes it before calling the handler.
    pub token: TokenType,
    /// Display keywords, e.g. `"GROUP BY"`.
    pub display: String,
    pub slot: ClauseSlot,
    /// Inline clauses print on one line; the rest indent their value.
    pub inline: bool,
    pub handler: ClauseHandler,
}

impl fmt::Debug for ClauseDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClauseDef")
            .field("token", &self.token)
            .field("display", &self.display)
            .field("slot", &self.slot)
            .field("inline", &self.inline)
            .finish_non_exhaustive()
    }
}

/// Expression operator precedence, lowest binds loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    Lowest = 0,
    Or = 1,
    And = 2,
    Not = 3,
    Comparison = 4,
    Addition = 5,
    Multiply = 6,
    Unary = 7,
    Postfix = 8,
}

/// One entry of the operator table.
#[derive(Clone)]
pub struct OperatorDef {
    pub precedence: Precedence,
    /// Custom infix behavior; `None` builds a plain binary node.
    pub handler: Option<InfixHandler>,
}

impl fmt::Debug for OperatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDef")
            .field("precedence", &self.precedence)
            .field("custom", &self.handler.is_some())
            .finish()
    }
}

/// One entry of the join-type table, keyed by its trigger token.
#[derive(Debug, Clone)]
pub struct JoinDef {
    /// The type string stored on the AST node, e.g. `"INNER"`, `"ASOF"`.
    pub name: String,
    /// Optional modifier token accepted after the trigger (`OUTER`).
    pub modifier: Option<TokenType>,
    /// Tokens that may follow to form a two-token compound
    /// (`LEFT` + `SEMI` → `LEFT SEMI`); the second token must have its own
    /// entry, whose condition rules win.
    pub compound_with: Vec<TokenType>,
    /// Whether the join takes a condition at all; `false` forbids both
    /// `ON` and `USING` (CROSS, POSITIONAL).
    pub requires_on: bool,
    pub allows_using: bool,
}

impl JoinDef {
    /// An ANSI-style conditioned join (`ON` required, `USING` accepted).
    #[must_use]
    pub fn conditioned(name: &str) -> Self {
        Self {
            name: String::from(name),
            modifier: None,
            compound_with: Vec::new(),
            requires_on: true,
            allows_using: true,
        }
    }

    /// A join that forbids `ON`/`USING` entirely.
    #[must_use]
    pub fn condition_free(name: &str) -> Self {
        Self {
            name: String::from(name),
            modifier: None,
            compound_with: Vec::new(),
            requires_on: false,
            allows_using: false,
        }
    }

    /// Adds an accepted modifier token.
    #[must_use]
    pub fn with_modifier(mut self, token: TokenType) -> Self {
        self.modifier = Some(token);
        self
    }

    /// Adds accepted compound-forming tokens.
    #[must_use]
    pub fn with_compounds(mut self, tokens: &[TokenType]) -> Self {
        self.compound_with.extend_from_slice(tokens);
        self
    }
}
