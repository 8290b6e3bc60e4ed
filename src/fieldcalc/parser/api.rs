//! Public API for the parser.
//!
//! A parse is parameterized by a [`StartSymbol`] naming the expected result:
//! anything (`Default`), one of the twelve kind/domain pairs (`Typed`), or one
//! of the two argument-scanning modes plugin functions use to consume their
//! own argument text piece by piece.

use chumsky::prelude::*;
use chumsky::Stream;

use super::ast::Expr;
use super::grammar::{argument, complete, terminator_only, to_syntax_error};
use crate::fieldcalc::error::{Result, Span};
use crate::fieldcalc::lexer::{tokenize, Token};
use crate::fieldcalc::value::FieldType;

/// What ends a plugin argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// `,` or `;`, more arguments follow
    Comma,
    /// `)`, the last argument
    Close,
}

/// The expected top-level result of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartSymbol {
    /// Whatever the expression produces: a single value or a field.
    Default,
    /// A field of exactly this kind and domain. Uniform results are spread
    /// over the domain.
    Typed(FieldType),
    /// A plugin argument: an expression of this type followed by a terminator.
    Argument(FieldType, Terminator),
    /// A bare terminator, for plugin functions that take no argument here.
    TerminatorOnly(Terminator),
}

impl StartSymbol {
    /// The field type the result must have, if constrained.
    pub fn expected(&self) -> Option<FieldType> {
        match self {
            StartSymbol::Typed(ft) | StartSymbol::Argument(ft, _) => Some(*ft),
            StartSymbol::Default | StartSymbol::TerminatorOnly(_) => None,
        }
    }
}

/// Outcome of a parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The expression, absent for [`StartSymbol::TerminatorOnly`].
    pub expr: Option<Expr>,
    /// Byte offset just past the consumed input. For complete parses this is
    /// the source length; for argument modes it is the end of the terminator.
    pub end: usize,
}

/// Parse a token stream according to `start`.
pub fn parse(tokens: Vec<(Token, Span)>, source_len: usize, start: &StartSymbol) -> Result<Parsed> {
    let stream = Stream::from_iter(source_len..source_len, tokens.into_iter());

    match start {
        StartSymbol::Default | StartSymbol::Typed(_) => complete()
            .parse(stream)
            .map(|expr| Parsed {
                expr: Some(expr),
                end: source_len,
            })
            .map_err(to_syntax_error),
        StartSymbol::Argument(_, term) => argument(*term)
            .parse(stream)
            .map(|(expr, close)| Parsed {
                expr: Some(expr),
                end: close.end,
            })
            .map_err(to_syntax_error),
        StartSymbol::TerminatorOnly(term) => terminator_only(*term)
            .parse(stream)
            .map(|close| Parsed {
                expr: None,
                end: close.end,
            })
            .map_err(to_syntax_error),
    }
}

/// Tokenize and parse source text in one go.
pub fn parse_source(
    source: &str,
    start: &StartSymbol,
    is_plugin: impl Fn(&str) -> bool,
) -> Result<Parsed> {
    let tokens = tokenize(source, is_plugin)?;
    parse(tokens, source.len(), start)
}
