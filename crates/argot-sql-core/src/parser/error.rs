//! Parse diagnostics and the public failure type.
//!
//! Parsing never stops at the first problem. Diagnostics accumulate in
//! source order while the parser recovers and keeps going, so one pass
//! over a broken statement reports every independent issue and still
//! yields a partial tree. [`ParseFailure`] wraps the accumulated list for
//! `Result`-shaped entry points.

use std::fmt;

use thiserror::Error;

use crate::lexer::{Position, Span};

/// Which stage of analysis produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed input at the character level, such as an unterminated
    /// string or a stray byte.
    Lexical,
    /// A structurally invalid token sequence.
    Syntax,
    /// Syntax that is valid in some dialect but not the active one.
    DialectRejection,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Lexical => "lexical error",
            Self::Syntax => "syntax error",
            Self::DialectRejection => "not supported",
        };
        f.write_str(label)
    }
}

/// A single problem found while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The producing stage.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// The offending source range.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Creates a [`DiagnosticKind::Lexical`] diagnostic.
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Lexical, message, span)
    }

    /// Creates a [`DiagnosticKind::Syntax`] diagnostic.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    /// Creates a [`DiagnosticKind::DialectRejection`] diagnostic.
    pub fn rejection(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::DialectRejection, message, span)
    }

    /// Returns the position where the problem starts.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.span.start
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.span.start.line, self.span.start.column, self.kind, self.message
        )
    }
}

/// Error for `Result`-shaped entry points when parsing produced at least
/// one diagnostic.
///
/// `first` is the earliest diagnostic and doubles as the `Display` text;
/// `diagnostics` holds the full list in source order, `first` included.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{first}")]
pub struct ParseFailure {
    /// The earliest diagnostic.
    pub first: Diagnostic,
    /// Every diagnostic, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseFailure {
    /// Wraps a non-empty diagnostic list; returns `None` for an empty one.
    #[must_use]
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        let first = diagnostics.first()?.clone();
        Some(Self { first, diagnostics })
    }
}
