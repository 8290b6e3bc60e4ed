//! Expression grammar built with chumsky
//!
//! Precedence climbs from the ternary conditional up to atoms:
//!
//! 1. `c ? a : b` (right associative)
//! 2. `||`
//! 3. `&&`
//! 4. `==` `!=`
//! 5. `<` `>` `<=` `>=`
//! 6. `+` `-`
//! 7. `*` `/` `%`
//! 8. `&` `^`
//! 9. prefix `-` `!` `*`
//! 10. postfix `.x` and `.T()`
//! 11. literals, names, calls, parentheses
//!
//! `&&` is a single token shared by logical and and the double inner product.
//! The grammar keeps it on one tier; operand kinds decide the meaning later.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;

use super::api::Terminator;
use super::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::fieldcalc::error::{ExprError, Span};
use crate::fieldcalc::lexer::Token;

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

enum Accessor {
    Component(String),
    Transpose,
}

fn token(t: Token) -> impl Parser<Token, (), Error = ParserError> + Clone {
    just(t).ignored()
}

fn identifier() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Ident(name) => Ok(name),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

fn number() -> impl Parser<Token, f64, Error = ParserError> + Clone {
    filter_map(|span: Span, tok| match tok {
        Token::Number(text) => text
            .parse::<f64>()
            .map_err(|_| Simple::custom(span, format!("invalid number '{}'", text))),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

fn binary_tier(
    lower: impl Parser<Token, Expr, Error = ParserError> + Clone + 'static,
    ops: impl Parser<Token, BinaryOp, Error = ParserError> + Clone + 'static,
) -> BoxedParser<'static, Token, Expr, ParserError> {
    lower
        .clone()
        .then(ops.then(lower).repeated())
        .foldl(|lhs, (op, rhs)| {
            let span = lhs.span.start..rhs.span.end;
            Expr::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span)
        })
        .boxed()
}

/// The full expression grammar, without an end-of-input requirement.
pub(crate) fn expression() -> impl Parser<Token, Expr, Error = ParserError> + Clone {
    recursive(|expr| {
        let literal = choice((
            number().map(ExprKind::Number),
            token(Token::True).to(ExprKind::Bool(true)),
            token(Token::False).to(ExprKind::Bool(false)),
            filter_map(|span, tok| match tok {
                Token::PluginCall {
                    name,
                    arguments,
                    offset,
                } => Ok(ExprKind::PluginCall {
                    name,
                    arguments,
                    offset,
                }),
                other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
            }),
        ))
        .map_with_span(Expr::new);

        let call_or_name = identifier()
            .then(
                expr.clone()
                    .separated_by(token(Token::Comma))
                    .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
                    .or_not(),
            )
            .map_with_span(|(name, args), span| match args {
                Some(args) => Expr::new(ExprKind::Call { name, args }, span),
                None => Expr::new(ExprKind::Ident(name), span),
            });

        let parenthesized = expr
            .clone()
            .delimited_by(token(Token::OpenParen), token(Token::CloseParen));

        let atom = choice((literal, call_or_name, parenthesized)).boxed();

        let accessor = token(Token::Period)
            .ignore_then(identifier())
            .then(
                token(Token::OpenParen)
                    .then(token(Token::CloseParen))
                    .or_not(),
            )
            .try_map(|(name, parens), span| match parens {
                None => Ok(Accessor::Component(name)),
                Some(_) if name == "T" => Ok(Accessor::Transpose),
                Some(_) => Err(Simple::custom(span, format!("unknown method '{}()'", name))),
            })
            .map_with_span(|accessor, span: Span| (accessor, span));

        let postfix = atom
            .then(accessor.repeated())
            .foldl(|inner, (accessor, span)| {
                let full = inner.span.start..span.end;
                let kind = match accessor {
                    Accessor::Component(name) => ExprKind::Component(Box::new(inner), name),
                    Accessor::Transpose => ExprKind::Transpose(Box::new(inner)),
                };
                Expr::new(kind, full)
            })
            .boxed();

        let prefix = choice((
            token(Token::Minus).to(UnaryOp::Negate),
            token(Token::Bang).to(UnaryOp::Not),
            token(Token::Star).to(UnaryOp::Hodge),
        ))
        .map_with_span(|op, span: Span| (op, span));

        let unary = prefix
            .repeated()
            .then(postfix)
            .foldr(|(op, span), operand| {
                let full = span.start..operand.span.end;
                Expr::new(ExprKind::Unary(op, Box::new(operand)), full)
            })
            .boxed();

        let products = binary_tier(
            unary,
            choice((
                token(Token::Amp).to(BinaryOp::Dot),
                token(Token::Caret).to(BinaryOp::Cross),
            )),
        );

        let multiplicative = binary_tier(
            products,
            choice((
                token(Token::Star).to(BinaryOp::Multiply),
                token(Token::Slash).to(BinaryOp::Divide),
                token(Token::Percent).to(BinaryOp::Modulo),
            )),
        );

        let additive = binary_tier(
            multiplicative,
            choice((
                token(Token::Plus).to(BinaryOp::Add),
                token(Token::Minus).to(BinaryOp::Subtract),
            )),
        );

        let relational = binary_tier(
            additive,
            choice((
                token(Token::LessEqual).to(BinaryOp::LessEqual),
                token(Token::GreaterEqual).to(BinaryOp::GreaterEqual),
                token(Token::Less).to(BinaryOp::Less),
                token(Token::Greater).to(BinaryOp::Greater),
            )),
        );

        let equality = binary_tier(
            relational,
            choice((
                token(Token::EqualEqual).to(BinaryOp::Equal),
                token(Token::BangEqual).to(BinaryOp::NotEqual),
            )),
        );

        let and = binary_tier(equality, token(Token::AmpAmp).to(BinaryOp::AndAnd));
        let or = binary_tier(and, token(Token::PipePipe).to(BinaryOp::Or));

        or.then(
            token(Token::Question)
                .ignore_then(expr.clone())
                .then_ignore(token(Token::Colon))
                .then(expr)
                .or_not(),
        )
        .map(|(condition, branches)| match branches {
            None => condition,
            Some((when_true, when_false)) => {
                let span = condition.span.start..when_false.span.end;
                Expr::new(
                    ExprKind::Conditional(
                        Box::new(condition),
                        Box::new(when_true),
                        Box::new(when_false),
                    ),
                    span,
                )
            }
        })
    })
}

/// One argument terminator, answering its span.
pub(crate) fn terminator(
    term: Terminator,
) -> impl Parser<Token, Span, Error = ParserError> + Clone {
    filter(move |t: &Token| match term {
        Terminator::Comma => t.is_separator(),
        Terminator::Close => *t == Token::CloseParen,
    })
    .map_with_span(|_, span| span)
}

/// Whole input as one expression.
pub(crate) fn complete() -> impl Parser<Token, Expr, Error = ParserError> + Clone {
    expression().then_ignore(end())
}

/// An expression followed by a terminator; whatever follows is left alone.
pub(crate) fn argument(
    term: Terminator,
) -> impl Parser<Token, (Expr, Span), Error = ParserError> + Clone {
    expression()
        .then(terminator(term))
        .then_ignore(any().repeated())
        .then_ignore(end())
}

/// Only a terminator; whatever follows is left alone.
pub(crate) fn terminator_only(
    term: Terminator,
) -> impl Parser<Token, Span, Error = ParserError> + Clone {
    terminator(term)
        .then_ignore(any().repeated())
        .then_ignore(end())
}

/// Convert the first chumsky error into an [`ExprError::Syntax`].
pub(crate) fn to_syntax_error(errors: Vec<ParserError>) -> ExprError {
    let Some(err) = errors.into_iter().next() else {
        return ExprError::syntax("invalid expression", 0..0, None);
    };
    let found = err.found().map(|t| t.to_string());
    let found_text = found
        .as_deref()
        .map(|f| format!("'{}'", f))
        .unwrap_or_else(|| "end of input".to_string());

    let message = match err.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed '{}'", delimiter),
        SimpleReason::Unexpected => {
            let mut expected: Vec<String> = err
                .expected()
                .map(|e| match e {
                    Some(t) => format!("'{}'", t),
                    None => "end of input".to_string(),
                })
                .collect();
            expected.sort();
            expected.dedup();
            if expected.is_empty() {
                format!("unexpected {}", found_text)
            } else {
                format!("unexpected {}, expected {}", found_text, expected.join(" or "))
            }
        }
    };

    ExprError::syntax(message, err.span(), found)
}
