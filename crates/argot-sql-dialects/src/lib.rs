//! # argot-sql-dialects
//!
//! Ready-made dialects for `argot-sql-core`:
//!
//! - [`duckdb`]: `QUALIFY`, `GROUP BY ALL` / `ORDER BY ALL`, star
//!   modifiers (`EXCLUDE` / `REPLACE` / `RENAME`), `SEMI` / `ANTI` /
//!   `ASOF` / `POSITIONAL` joins, `PIVOT` / `UNPIVOT`, lambdas, list and
//!   struct literals, `[]` indexing and slicing, `//`, `::`, `ILIKE`
//! - [`postgres`]: lowercase identifier folding, `$n` placeholders,
//!   `ILIKE`, `::` casts
//! - [`sqlite`]: backtick quoting, `GLOB` / `REGEXP` / `MATCH`
//!
//! All three compose on top of [`ansi`](argot_sql_core::dialect::ansi),
//! so the shared grammar stays in one place and each file here only
//! spells out what the dialect adds.
//!
//! ```rust
//! use argot_sql_core::dialect::require_dialect;
//! use argot_sql_core::{format, parse_sql};
//!
//! argot_sql_dialects::install();
//!
//! let duckdb = require_dialect("duckdb")?;
//! let parse = parse_sql(
//!     "SELECT city, SUM(total) FROM orders GROUP BY ALL QUALIFY rank() OVER (ORDER BY SUM(total) DESC) <= 3",
//!     &duckdb,
//! )?;
//! let pretty = format(&parse.stmt, &duckdb);
//! assert!(pretty.contains("GROUP BY ALL"));
//! assert!(pretty.contains("QUALIFY"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cast;
mod duckdb;
mod postgres;
mod sqlite;

pub use duckdb::duckdb;
pub use postgres::postgres;
pub use sqlite::sqlite;

use argot_sql_core::dialect::{ansi, register_dialect};

/// Registers `ansi` and every dialect in this crate with the shared
/// registry, making them reachable through
/// [`get_dialect`](argot_sql_core::dialect::get_dialect) and
/// [`require_dialect`](argot_sql_core::dialect::require_dialect) by
/// name. Safe to call more than once; the first registration of a name
/// wins.
pub fn install() {
    register_dialect(ansi());
    register_dialect(duckdb());
    register_dialect(postgres());
    register_dialect(sqlite());
    tracing::debug!("installed built-in dialects");
}
