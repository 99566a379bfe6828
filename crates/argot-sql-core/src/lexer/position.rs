//! Source location tracking for tokens, comments, and AST nodes.

use serde::{Deserialize, Serialize};

/// A position in the source text.
///
/// `line` and `column` are 1-based; `offset` is the 0-based byte index.
/// All three advance together as the lexer consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based).
    pub column: u32,
    /// Byte offset into the source (0-based).
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first byte of any source text.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// A half-open span in the source code.
///
/// `end` is the first position *after* the spanned text, so an empty span
/// has `start == end` and `end.offset >= start.offset` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty span at the start of the source, used as a placeholder.
    pub const EMPTY: Self = Self {
        start: Position::START,
        end: Position::START,
    };

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start.offset < other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset > other.end.offset {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The kind of a source comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    /// A `-- ...` comment running to the end of the line.
    Line,
    /// A `/* ... */` comment.
    Block,
}

/// A comment collected by the lexer.
///
/// `text` includes the delimiters (`--` or `/* */`) so the formatter can
/// re-emit the comment exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Line or block.
    pub kind: CommentKind,
    /// The full comment text, delimiters included.
    pub text: String,
    /// Where the comment appeared.
    pub span: Span,
}

impl Comment {
    /// Creates a new comment record.
    #[must_use]
    pub const fn new(kind: CommentKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }
}
