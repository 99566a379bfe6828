//! The dialect framework.
//!
//! A dialect is data plus dispatch tables, assembled by composition through
//! [`DialectBuilder`] and immutable afterwards. The parser consults the
//! active dialect at every extension point: clause triggers, operators,
//! join types, star modifiers, FROM-item hooks, and prefix expression
//! syntax. Composing on top of another dialect copies its tables at build
//! time, so lookups never chase a parent chain.

mod ansi;
mod builder;
mod config;
mod def;
mod registry;

pub use ansi::ansi;
pub use builder::DialectBuilder;
pub use config::{
    DialectConfig, FunctionSets, IdentNormalization, PlaceholderStyle, QuotingRule,
};
pub use def::{
    ClauseDef, ClauseHandler, ClauseSlot, ClauseValue, FromItemHandler, InfixHandler, JoinDef,
    OperatorDef, Precedence, PrefixHandler, StarModifierHandler,
};
pub use registry::{
    clause_display_name, dialect_names, get_dialect, is_registered_clause_token,
    register_clause_name, register_dialect, require_dialect, RegistryError,
};

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::lexer::TokenType;

/// An immutable dialect descriptor: configuration data plus the parsing
/// behavior tables the parser dispatches through.
pub struct Dialect {
    config: DialectConfig,
    /// Clause table; looked up by trigger token while parsing and by
    /// slot while printing.
    clauses: Vec<ClauseDef>,
    operators: HashMap<TokenType, OperatorDef>,
    joins: HashMap<TokenType, JoinDef>,
    star_modifiers: HashMap<TokenType, StarModifierHandler>,
    from_items: HashMap<TokenType, FromItemHandler>,
    prefixes: HashMap<TokenType, PrefixHandler>,
    /// Uppercased word → tag, consulted by the lexer after the built-in
    /// keyword table.
    keywords: HashMap<String, TokenType>,
    /// Multi-character symbols, longest first.
    symbols: Vec<(String, TokenType)>,
    /// Tokens usable in `expr [NOT] <op> pattern` position.
    like_operators: HashSet<TokenType>,
    // Classification sets, pre-normalized for lookup.
    aggregate_fns: HashSet<String>,
    generator_fns: HashSet<String>,
    window_fns: HashSet<String>,
    table_fns: HashSet<String>,
}

impl Dialect {
    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration data.
    #[must_use]
    pub const fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Returns the ordered clause sequence.
    #[must_use]
    pub fn clauses(&self) -> &[ClauseDef] {
        &self.clauses
    }

    /// Scans the clause sequence for a definition triggered by `ty`.
    #[must_use]
    pub fn clause_for(&self, ty: TokenType) -> Option<&ClauseDef> {
        self.clauses.iter().find(|c| c.token == ty)
    }

    /// Returns true if `ty` triggers a clause in this dialect.
    #[must_use]
    pub fn is_clause_token(&self, ty: TokenType) -> bool {
        self.clause_for(ty).is_some()
    }

    /// Scans the clause sequence for the definition filling `slot`.
    #[must_use]
    pub fn clause_for_slot(&self, slot: ClauseSlot) -> Option<&ClauseDef> {
        self.clauses.iter().find(|c| c.slot == slot)
    }

    /// Returns the operator entry for `ty`, if any.
    #[must_use]
    pub fn operator(&self, ty: TokenType) -> Option<&OperatorDef> {
        self.operators.get(&ty)
    }

    /// Returns the binding precedence of `ty`, or `Lowest` if it is not
    /// an operator here.
    #[must_use]
    pub fn precedence_of(&self, ty: TokenType) -> Precedence {
        self.operators
            .get(&ty)
            .map_or(Precedence::Lowest, |op| op.precedence)
    }

    /// Returns the join definition triggered by `ty`, if any.
    #[must_use]
    pub fn join_def(&self, ty: TokenType) -> Option<&JoinDef> {
        self.joins.get(&ty)
    }

    /// Returns the star-modifier handler triggered by `ty`, if any.
    #[must_use]
    pub fn star_modifier(&self, ty: TokenType) -> Option<&StarModifierHandler> {
        self.star_modifiers.get(&ty)
    }

    /// Returns the FROM-item extension handler triggered by `ty`, if any.
    #[must_use]
    pub fn from_item(&self, ty: TokenType) -> Option<&FromItemHandler> {
        self.from_items.get(&ty)
    }

    /// Returns the prefix expression handler triggered by `ty`, if any.
    #[must_use]
    pub fn prefix(&self, ty: TokenType) -> Option<&PrefixHandler> {
        self.prefixes.get(&ty)
    }

    /// Looks up an uppercased word in this dialect's keyword table.
    #[must_use]
    pub fn dynamic_keyword(&self, upper: &str) -> Option<TokenType> {
        self.keywords.get(upper).copied()
    }

    /// Returns the multi-character symbol table, longest first.
    #[must_use]
    pub fn symbols(&self) -> &[(String, TokenType)] {
        &self.symbols
    }

    /// Returns true if `ty` may appear in `expr [NOT] <op> pattern`
    /// position (`LIKE` and dialect relatives such as `ILIKE`).
    #[must_use]
    pub fn is_like_operator(&self, ty: TokenType) -> bool {
        self.like_operators.contains(&ty)
    }

    /// Folds an unquoted identifier per this dialect's normalization.
    #[must_use]
    pub fn normalize_ident(&self, ident: &str) -> String {
        match self.config.quoting.normalization {
            IdentNormalization::Lower => ident.to_ascii_lowercase(),
            IdentNormalization::Upper => ident.to_ascii_uppercase(),
            IdentNormalization::CaseSensitive | IdentNormalization::CaseInsensitiveCompare => {
                String::from(ident)
            }
        }
    }

    /// Compares two identifiers under this dialect's rules.
    #[must_use]
    pub fn idents_equal(&self, a: &str, b: &str) -> bool {
        match self.config.quoting.normalization {
            IdentNormalization::CaseSensitive => a == b,
            IdentNormalization::CaseInsensitiveCompare => a.eq_ignore_ascii_case(b),
            IdentNormalization::Lower | IdentNormalization::Upper => {
                self.normalize_ident(a) == self.normalize_ident(b)
            }
        }
    }

    /// Quotes an identifier, doubling any embedded close characters.
    #[must_use]
    pub fn quote_ident(&self, ident: &str) -> String {
        let q = self.config.quoting;
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(q.open);
        for ch in ident.chars() {
            if ch == q.close {
                out.push(q.escape);
            }
            out.push(ch);
        }
        out.push(q.close);
        out
    }

    /// Returns true if `name` is a known aggregate function.
    #[must_use]
    pub fn is_aggregate_function(&self, name: &str) -> bool {
        self.aggregate_fns.contains(&lookup_key(self, name))
    }

    /// Returns true if `name` is a known generator function.
    #[must_use]
    pub fn is_generator_function(&self, name: &str) -> bool {
        self.generator_fns.contains(&lookup_key(self, name))
    }

    /// Returns true if `name` is a known window function.
    #[must_use]
    pub fn is_window_function(&self, name: &str) -> bool {
        self.window_fns.contains(&lookup_key(self, name))
    }

    /// Returns true if `name` is a known table function.
    #[must_use]
    pub fn is_table_function(&self, name: &str) -> bool {
        self.table_fns.contains(&lookup_key(self, name))
    }
}

/// Normalizes a function name for set membership under the dialect's
/// comparison rules.
fn lookup_key(dialect: &Dialect, name: &str) -> String {
    match dialect.config.quoting.normalization {
        IdentNormalization::CaseSensitive => String::from(name),
        _ => name.to_ascii_uppercase(),
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.config.name)
            .field("clauses", &self.clauses.len())
            .field("operators", &self.operators.len())
            .field("joins", &self.joins.len())
            .finish_non_exhaustive()
    }
}
