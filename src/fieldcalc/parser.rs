//! Parser for field expressions
//!
//! The grammar turns the token stream into a spanned [`Expr`] tree. Kind
//! checking is not part of parsing; see the semantics module.

pub mod api;
pub mod ast;
pub(crate) mod grammar;

pub use api::{parse, parse_source, Parsed, StartSymbol, Terminator};
pub use ast::{BinaryOp, Expr, ExprKind, UnaryOp};

#[cfg(test)]
mod tests;
