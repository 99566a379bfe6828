//! Dialect configuration data.
//!
//! Everything here is plain data: quoting rules, normalization strategy,
//! placeholder style, function classification sets, and word lists. It
//! serializes round-trip with serde so vendor vocabularies can live in
//! files, and database adapters consume this type alone, never the parsing
//! framework behind it.

use serde::{Deserialize, Serialize};

/// How a dialect folds unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IdentNormalization {
    /// Fold to lowercase (postgres).
    Lower,
    /// Fold to uppercase (ANSI).
    Upper,
    /// Keep as written; comparisons are exact.
    CaseSensitive,
    /// Keep as written; comparisons ignore case (sqlite, duckdb).
    #[default]
    CaseInsensitiveCompare,
}

/// Identifier quoting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotingRule {
    /// Opening quote character.
    pub open: char,
    /// Closing quote character.
    pub close: char,
    /// Escape character; by convention the close character, doubled.
    pub escape: char,
    /// Unquoted-identifier folding strategy.
    pub normalization: IdentNormalization,
}

impl Default for QuotingRule {
    fn default() -> Self {
        Self {
            open: '"',
            close: '"',
            escape: '"',
            normalization: IdentNormalization::default(),
        }
    }
}

/// Bind-parameter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Question,
    /// `$1, $2, ...`
    Dollar,
}

/// Function name classification sets.
///
/// Names are stored as written in the vocabulary source; lookups normalize
/// both sides per the dialect's normalization strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FunctionSets {
    pub aggregate: Vec<String>,
    pub generator: Vec<String>,
    pub window: Vec<String>,
    pub table: Vec<String>,
}

/// The data half of a dialect descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Registry name, matched case-insensitively.
    pub name: String,
    pub quoting: QuotingRule,
    pub default_schema: Option<String>,
    pub placeholder: PlaceholderStyle,
    pub functions: FunctionSets,
    /// Keyword vocabulary beyond the ANSI built-ins.
    pub keywords: Vec<String>,
    /// Words that may not be used as bare identifiers.
    pub reserved_words: Vec<String>,
    /// Known type names, for CAST targets and adapters.
    pub data_types: Vec<String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            quoting: QuotingRule::default(),
            default_schema: None,
            placeholder: PlaceholderStyle::default(),
            functions: FunctionSets::default(),
            keywords: Vec::new(),
            reserved_words: Vec::new(),
            data_types: Vec::new(),
        }
    }
}

impl DialectConfig {
    /// Creates a config with the given registry name and defaults
    /// everywhere else.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: String::from(name),
            ..Self::default()
        }
    }
}
