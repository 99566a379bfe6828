//! SQL Parser
//!
//! A hand-written recursive descent parser with precedence-climbing
//! expression parsing, a dialect-driven clause loop, and error recovery
//! that accumulates diagnostics instead of stopping at the first one.

mod ctx;
mod error;
mod expr;
mod parser;

pub use ctx::ClauseCtx;
pub use error::{Diagnostic, DiagnosticKind, ParseFailure};
pub use parser::{parse_sql, Parse, Parser};
