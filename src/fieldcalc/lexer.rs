//! Lexer for field expressions
//!
//! Tokenization is a single logos pass. The only processing on top of it is
//! the folding of plugin-function calls: an identifier registered as a plugin
//! and followed by `(` swallows its raw argument text up to the matching `)`,
//! because plugin arguments follow grammars of their own.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::tokenize;
pub use tokens::Token;
