//! Lexical analysis: positions, tokens, the dynamic keyword registry, and
//! the dialect-aware lexer.

mod position;
mod token;
mod tokenizer;

pub use position::{Comment, CommentKind, Position, Span};
pub use token::{lookup_keyword, register_keyword, registered_name, Token, TokenType};
pub use tokenizer::{LexOutput, Lexer};
