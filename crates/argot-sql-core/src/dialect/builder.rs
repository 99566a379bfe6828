//! Dialect assembly.
//!
//! The builder accumulates a dialect's tables and freezes them into an
//! immutable [`Dialect`]. Composition is flattened: [`DialectBuilder::inherit`]
//! copies the parent's tables and vocabulary at build time, so a composed
//! dialect answers lookups without chasing a parent chain, and later
//! definitions override earlier ones token-by-token.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::ast::{Expr, StarModifier, TableRef};
use crate::lexer::{register_keyword, TokenType};
use crate::parser::{ClauseCtx, Diagnostic};

use super::def::{
    ClauseDef, ClauseSlot, ClauseValue, FromItemHandler, InfixHandler, JoinDef, OperatorDef,
    Precedence, PrefixHandler, StarModifierHandler,
};
use super::registry::register_clause_name;
use super::{Dialect, DialectConfig, IdentNormalization};

/// Accumulates dialect tables; see the module docs for the composition
/// rules.
pub struct DialectBuilder {
    config: DialectConfig,
    clauses: Vec<ClauseDef>,
    operators: HashMap<TokenType, OperatorDef>,
    joins: HashMap<TokenType, JoinDef>,
    star_modifiers: HashMap<TokenType, StarModifierHandler>,
    from_items: HashMap<TokenType, FromItemHandler>,
    prefixes: HashMap<TokenType, PrefixHandler>,
    keywords: HashMap<String, TokenType>,
    symbols: Vec<(String, TokenType)>,
    like_operators: HashSet<TokenType>,
}

impl DialectBuilder {
    /// Starts a builder from configuration data.
    #[must_use]
    pub fn new(config: DialectConfig) -> Self {
        Self {
            config,
            clauses: Vec::new(),
            operators: HashMap::new(),
            joins: HashMap::new(),
            star_modifiers: HashMap::new(),
            from_items: HashMap::new(),
            prefixes: HashMap::new(),
            keywords: HashMap::new(),
            symbols: Vec::new(),
            like_operators: HashSet::new(),
        }
    }

    /// Copies `parent`'s tables and vocabulary into this builder.
    ///
    /// Call before declaring the child's own entries so overrides land on
    /// top. The child keeps its own name, quoting, and placeholder style;
    /// word lists and function sets are merged, parent entries appended
    /// where the child lacks them.
    #[must_use]
    pub fn inherit(mut self, parent: &Dialect) -> Self {
        self.clauses = parent.clauses().to_vec();
        self.operators = parent.operators.clone();
        self.joins = parent.joins.clone();
        self.star_modifiers = parent.star_modifiers.clone();
        self.from_items = parent.from_items.clone();
        self.prefixes = parent.prefixes.clone();
        self.keywords = parent.keywords.clone();
        self.symbols = parent.symbols.clone();
        self.like_operators = parent.like_operators.clone();

        let pc = parent.config();
        merge_words(&mut self.config.functions.aggregate, &pc.functions.aggregate);
        merge_words(&mut self.config.functions.generator, &pc.functions.generator);
        merge_words(&mut self.config.functions.window, &pc.functions.window);
        merge_words(&mut self.config.functions.table, &pc.functions.table);
        merge_words(&mut self.config.keywords, &pc.keywords);
        merge_words(&mut self.config.reserved_words, &pc.reserved_words);
        merge_words(&mut self.config.data_types, &pc.data_types);
        self
    }

    /// Registers `name` as a keyword of this dialect, allocating (or
    /// reusing) its global tag.
    #[must_use]
    pub fn keyword(mut self, name: &str) -> Self {
        let ty = register_keyword(name);
        self.keywords.insert(name.to_ascii_uppercase(), ty);
        self
    }

    /// Registers a multi-character symbol (e.g. `//`), allocating (or
    /// reusing) its global tag.
    #[must_use]
    pub fn symbol(mut self, text: &str) -> Self {
        let ty = register_keyword(text);
        if let Some(entry) = self.symbols.iter_mut().find(|(s, _)| s == text) {
            entry.1 = ty;
        } else {
            self.symbols.push((String::from(text), ty));
        }
        self
    }

    /// Declares a clause: trigger token, display keywords, destination
    /// slot, rendering shape, and the handler run after the trigger is
    /// consumed. Also records the display name in the process-wide clause
    /// registry used for cross-dialect diagnostics.
    #[must_use]
    pub fn clause<H>(
        mut self,
        token: TokenType,
        display: &str,
        slot: ClauseSlot,
        inline: bool,
        handler: H,
    ) -> Self
    where
        H: Fn(&mut ClauseCtx<'_, '_>) -> Result<ClauseValue, Diagnostic> + Send + Sync + 'static,
    {
        register_clause_name(token, display);
        let def = ClauseDef {
            token,
            display: String::from(display),
            slot,
            inline,
            handler: Arc::new(handler),
        };
        if let Some(existing) = self.clauses.iter_mut().find(|c| c.token == token) {
            *existing = def;
        } else {
            self.clauses.push(def);
        }
        self
    }

    /// Declares a plain binary operator at the given precedence.
    #[must_use]
    pub fn operator(mut self, token: TokenType, precedence: Precedence) -> Self {
        self.operators.insert(
            token,
            OperatorDef {
                precedence,
                handler: None,
            },
        );
        self
    }

    /// Declares an infix operator with custom parsing behavior.
    #[must_use]
    pub fn infix<H>(mut self, token: TokenType, precedence: Precedence, handler: H) -> Self
    where
        H: Fn(&mut ClauseCtx<'_, '_>, Expr) -> Result<Expr, Diagnostic> + Send + Sync + 'static,
    {
        self.operators.insert(
            token,
            OperatorDef {
                precedence,
                handler: Some(Arc::new(handler) as InfixHandler),
            },
        );
        self
    }

    /// Declares a prefix expression extension, consulted before built-in
    /// primary parsing so a dialect can claim tokens like `[` or `{`.
    #[must_use]
    pub fn prefix<H>(mut self, token: TokenType, handler: H) -> Self
    where
        H: Fn(&mut ClauseCtx<'_, '_>) -> Result<Expr, Diagnostic> + Send + Sync + 'static,
    {
        self.prefixes.insert(token, Arc::new(handler) as PrefixHandler);
        self
    }

    /// Declares a join type triggered by `token`.
    #[must_use]
    pub fn join(mut self, token: TokenType, def: JoinDef) -> Self {
        self.joins.insert(token, def);
        self
    }

    /// Declares a star-modifier handler (`EXCLUDE`, `REPLACE`, ...).
    #[must_use]
    pub fn star_modifier<H>(mut self, token: TokenType, handler: H) -> Self
    where
        H: Fn(&mut ClauseCtx<'_, '_>) -> Result<StarModifier, Diagnostic> + Send + Sync + 'static,
    {
        self.star_modifiers
            .insert(token, Arc::new(handler) as StarModifierHandler);
        self
    }

    /// Declares a FROM-item extension handler (`PIVOT`, `UNPIVOT`).
    #[must_use]
    pub fn from_item<H>(mut self, token: TokenType, handler: H) -> Self
    where
        H: Fn(&mut ClauseCtx<'_, '_>, TableRef) -> Result<TableRef, Diagnostic>
            + Send
            + Sync
            + 'static,
    {
        self.from_items
            .insert(token, Arc::new(handler) as FromItemHandler);
        self
    }

    /// Marks `token` as a LIKE-family operator, enabling the
    /// `expr [NOT] <op> pattern` comparison form for it.
    #[must_use]
    pub fn like_operator(mut self, token: TokenType) -> Self {
        self.like_operators.insert(token);
        self
    }

    /// Freezes the accumulated tables into a [`Dialect`].
    #[must_use]
    pub fn build(mut self) -> Dialect {
        // Longest-first so the lexer can take the first match greedily.
        self.symbols
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let norm = self.config.quoting.normalization;
        let dialect = Dialect {
            aggregate_fns: classify_set(&self.config.functions.aggregate, norm),
            generator_fns: classify_set(&self.config.functions.generator, norm),
            window_fns: classify_set(&self.config.functions.window, norm),
            table_fns: classify_set(&self.config.functions.table, norm),
            config: self.config,
            clauses: self.clauses,
            operators: self.operators,
            joins: self.joins,
            star_modifiers: self.star_modifiers,
            from_items: self.from_items,
            prefixes: self.prefixes,
            keywords: self.keywords,
            symbols: self.symbols,
            like_operators: self.like_operators,
        };
        tracing::debug!(
            dialect = dialect.name(),
            clauses = dialect.clauses.len(),
            operators = dialect.operators.len(),
            joins = dialect.joins.len(),
            "built dialect"
        );
        dialect
    }
}

/// Appends `extra` entries absent from `base`, compared case-insensitively.
fn merge_words(base: &mut Vec<String>, extra: &[String]) {
    for word in extra {
        if !base.iter().any(|w| w.eq_ignore_ascii_case(word)) {
            base.push(word.clone());
        }
    }
}

/// Pre-normalizes a classification set for membership tests.
fn classify_set(names: &[String], norm: IdentNormalization) -> HashSet<String> {
    names
        .iter()
        .map(|n| match norm {
            IdentNormalization::CaseSensitive => n.clone(),
            _ => n.to_ascii_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_sort_longest_first() {
        let dialect = DialectBuilder::new(DialectConfig::named("probe-symbols"))
            .symbol("->")
            .symbol("->>")
            .symbol("//")
            .build();
        let lens: Vec<usize> = dialect.symbols().iter().map(|(s, _)| s.len()).collect();
        assert_eq!(lens, vec![3, 2, 2]);
    }

    #[test]
    fn test_keyword_table_is_case_folded() {
        let dialect = DialectBuilder::new(DialectConfig::named("probe-keywords"))
            .keyword("Qualify")
            .build();
        assert!(dialect.dynamic_keyword("QUALIFY").is_some());
        assert!(dialect.dynamic_keyword("qualify").is_none());
    }

    #[test]
    fn test_inherit_merges_vocabulary() {
        let mut base_config = DialectConfig::named("probe-base");
        base_config.functions.aggregate = vec![String::from("SUM")];
        base_config.data_types = vec![String::from("INTEGER")];
        let base = DialectBuilder::new(base_config)
            .operator(TokenType::PLUS, Precedence::Addition)
            .build();

        let mut child_config = DialectConfig::named("probe-child");
        child_config.functions.aggregate = vec![String::from("ARG_MAX")];
        let child = DialectBuilder::new(child_config).inherit(&base).build();

        assert!(child.is_aggregate_function("sum"));
        assert!(child.is_aggregate_function("arg_max"));
        assert_eq!(child.precedence_of(TokenType::PLUS), Precedence::Addition);
        assert_eq!(child.name(), "probe-child");
        assert!(child.config().data_types.iter().any(|t| t == "INTEGER"));
    }
}
