//! # argot-sql-core
//!
//! A dialect-aware SQL front end: lexer, parser, AST, and pretty-printer.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with precedence-climbing
//!   expression parsing and per-clause error recovery
//! - A dialect framework where clauses, operators, join types, and star
//!   modifiers are data plus handler closures, not hard-coded grammar
//! - A pretty-printer that emits one canonical multi-line layout and can
//!   reattach source comments by position
//!
//! ## Parsing and printing
//!
//! ```rust
//! use argot_sql_core::dialect::ansi;
//! use argot_sql_core::{format, parse_sql};
//!
//! let dialect = ansi();
//! let parse = parse_sql("SELECT id, total FROM orders WHERE paid = true", &dialect)?;
//! let pretty = format(&parse.stmt, &dialect);
//! assert!(pretty.starts_with("SELECT\n  id,\n  total\nFROM orders\n"));
//! # Ok::<(), argot_sql_core::parser::ParseFailure>(())
//! ```
//!
//! ## Error recovery
//!
//! A malformed clause produces a [`parser::Diagnostic`] and the parser
//! resynchronizes at the next clause boundary, so one typo does not hide
//! every later error:
//!
//! ```rust
//! use argot_sql_core::dialect::ansi;
//! use argot_sql_core::parser::Parser;
//!
//! let dialect = ansi();
//! let parse = Parser::new("SELECT a FROM t WHERE ORDER BY a", &dialect).parse();
//! assert!(!parse.diagnostics.is_empty());
//! assert_eq!(parse.stmt.body.left.order_by.len(), 1);
//! ```

pub mod ast;
pub mod dialect;
pub mod format;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, SelectStmt};
pub use format::{format, format_with_comments};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{parse_sql, Diagnostic, Parse, ParseFailure, Parser};
