//! pscc-lex - lexical analyzer.
//!
//! Transforms source text into a stream of [`Token`]s: identifiers and
//! reserved words, integer/real/string literals, and the delimiters and
//! operators of the source language's grammar. Whitespace and comments are
//! skipped, never emitted as tokens.

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token};
