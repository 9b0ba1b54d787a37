//! Syntax module for the CBC language
//!
//! Tokens, their source positions, and the tokenizer that produces them.

pub mod lexer;
pub mod token;

pub use lexer::tokenize;
pub use token::{is_binary_operator, Location, Span, Token, TokenId, TokenKind};
