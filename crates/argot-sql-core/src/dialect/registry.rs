//! Process-wide registries: dialect descriptors and clause display names.
//!
//! Both follow the same discipline as the keyword registry: writes happen
//! once per distinct name at dialect-registration time, reads run
//! concurrently during parsing, so each sits behind a reader/writer lock.
//! Registration is idempotent; the first registration of a name wins.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use thiserror::Error;

use crate::lexer::TokenType;

use super::Dialect;

/// Registry lookup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No dialect is registered under the requested name.
    #[error("unknown dialect `{0}`")]
    UnknownDialect(String),
}

fn dialects() -> &'static RwLock<HashMap<String, Arc<Dialect>>> {
    static DIALECTS: OnceLock<RwLock<HashMap<String, Arc<Dialect>>>> = OnceLock::new();
    DIALECTS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a dialect under its configured name, matched
/// case-insensitively. Re-registering a name keeps the first descriptor.
pub fn register_dialect(dialect: Arc<Dialect>) {
    let key = dialect.name().to_ascii_lowercase();
    let mut map = dialects().write().unwrap_or_else(PoisonError::into_inner);
    if map.contains_key(&key) {
        return;
    }
    tracing::debug!(dialect = dialect.name(), "registered dialect");
    map.insert(key, dialect);
}

/// Fetches a dialect by name, case-insensitively.
#[must_use]
pub fn get_dialect(name: &str) -> Option<Arc<Dialect>> {
    let map = dialects().read().unwrap_or_else(PoisonError::into_inner);
    map.get(&name.to_ascii_lowercase()).cloned()
}

/// Fetches a dialect by name or fails with [`RegistryError`].
pub fn require_dialect(name: &str) -> Result<Arc<Dialect>, RegistryError> {
    get_dialect(name).ok_or_else(|| RegistryError::UnknownDialect(String::from(name)))
}

/// Lists the registered dialect names, sorted.
#[must_use]
pub fn dialect_names() -> Vec<String> {
    let map = dialects().read().unwrap_or_else(PoisonError::into_inner);
    let mut names: Vec<String> = map.values().map(|d| String::from(d.name())).collect();
    names.sort();
    names
}

fn clause_names() -> &'static RwLock<HashMap<u16, String>> {
    static CLAUSES: OnceLock<RwLock<HashMap<u16, String>>> = OnceLock::new();
    CLAUSES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Records a clause display name for `token`, shared across all dialects.
///
/// The mapping exists purely so a dialect that does not understand a
/// clause can still name it in diagnostics ("QUALIFY is not supported in
/// postgres dialect"); it never affects parsing decisions.
pub fn register_clause_name(token: TokenType, display_name: &str) {
    let mut map = clause_names()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if map.contains_key(&token.raw()) {
        return;
    }
    tracing::debug!(clause = display_name, tag = token.raw(), "registered clause name");
    map.insert(token.raw(), String::from(display_name));
}

/// Returns the display name `token` was first registered under, if any
/// dialect in the process declares it as a clause trigger.
#[must_use]
pub fn clause_display_name(token: TokenType) -> Option<String> {
    let map = clause_names()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    map.get(&token.raw()).cloned()
}

/// Returns true if any dialect in the process uses `token` as a clause
/// trigger.
#[must_use]
pub fn is_registered_clause_token(token: TokenType) -> bool {
    let map = clause_names()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    map.contains_key(&token.raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DialectBuilder, DialectConfig};

    #[test]
    fn test_register_and_get_case_insensitive() {
        let d = Arc::new(DialectBuilder::new(DialectConfig::named("Probe-Registry")).build());
        register_dialect(Arc::clone(&d));
        let fetched = get_dialect("probe-registry").unwrap();
        assert_eq!(fetched.name(), "Probe-Registry");
        assert!(get_dialect("PROBE-REGISTRY").is_some());
    }

    #[test]
    fn test_reregistration_keeps_first() {
        let first = Arc::new(
            DialectBuilder::new(DialectConfig::named("probe-keeps-first")).build(),
        );
        register_dialect(Arc::clone(&first));
        let second = Arc::new({
            let mut config = DialectConfig::named("probe-keeps-first");
            config.keywords.push(String::from("MARKER"));
            DialectBuilder::new(config).build()
        });
        register_dialect(second);
        let fetched = get_dialect("probe-keeps-first").unwrap();
        assert!(fetched.config().keywords.is_empty());
    }

    #[test]
    fn test_require_unknown_dialect_errors() {
        let err = require_dialect("no-such-dialect").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown dialect `no-such-dialect`"
        );
    }

    #[test]
    fn test_clause_names_are_global() {
        let ty = crate::lexer::register_keyword("CLAUSEPROBE");
        register_clause_name(ty, "CLAUSEPROBE");
        assert!(is_registered_clause_token(ty));
        assert_eq!(clause_display_name(ty).as_deref(), Some("CLAUSEPROBE"));
        // First display name wins.
        register_clause_name(ty, "RENAMED");
        assert_eq!(clause_display_name(ty).as_deref(), Some("CLAUSEPROBE"));
    }

    #[test]
    fn test_dialect_names_sorted() {
        for name in ["probe-zz", "probe-aa"] {
            register_dialect(Arc::new(
                DialectBuilder::new(DialectConfig::named(name)).build(),
            ));
        }
        let names = dialect_names();
        let aa = names.iter().position(|n| n == "probe-aa").unwrap();
        let zz = names.iter().position(|n| n == "probe-zz").unwrap();
        assert!(aa < zz);
    }
}
