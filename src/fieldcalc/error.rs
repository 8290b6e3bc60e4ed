//! Error taxonomy of a parse-and-evaluate call
//!
//! Every error is terminal for the expression being evaluated. Spans are byte
//! ranges into the source text handed to the evaluator.

use crate::fieldcalc::value::FieldType;
use std::ops::Range;
use thiserror::Error;

pub type Span = Range<usize>;

pub type Result<T> = std::result::Result<T, ExprError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("syntax error at {}..{}: {message}", .span.start, .span.end)]
    Syntax {
        message: String,
        span: Span,
        /// The offending token as written, `None` at end of input.
        found: Option<String>,
    },

    #[error("size mismatch: {left} elements against {right}")]
    SizeMismatch { left: usize, right: usize },

    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("expected {expected}, found {found} at {}..{}", .span.start, .span.end)]
    KindMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("plugin function '{name}' used as {expected} but registered as {declared}")]
    PluginTypeMismatch {
        name: String,
        expected: FieldType,
        declared: String,
    },

    #[error("undefined numeric result: {what}")]
    UndefinedNumericResult { what: String },

    #[error("plugin function '{name}' failed: {message}")]
    Plugin { name: String, message: String },

    #[error("host collaborator failed: {message}")]
    Host { message: String },

    /// A typed tree the checker should never have produced.
    #[error("internal evaluator error: {message}")]
    Internal { message: String },
}

impl ExprError {
    pub(crate) fn syntax(message: impl Into<String>, span: Span, found: Option<String>) -> Self {
        ExprError::Syntax {
            message: message.into(),
            span,
            found,
        }
    }

    pub(crate) fn kind_mismatch(
        expected: impl ToString,
        found: impl ToString,
        span: Span,
    ) -> Self {
        ExprError::KindMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    /// Move spans of an error raised while scanning a sub-text that starts at
    /// byte `offset` of the enclosing source.
    pub fn shifted(self, offset: usize) -> Self {
        let shift = |span: Span| span.start + offset..span.end + offset;
        match self {
            ExprError::Syntax {
                message,
                span,
                found,
            } => ExprError::Syntax {
                message,
                span: shift(span),
                found,
            },
            ExprError::KindMismatch {
                expected,
                found,
                span,
            } => ExprError::KindMismatch {
                expected,
                found,
                span: shift(span),
            },
            other => other,
        }
    }

    /// Source location, when the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ExprError::Syntax { span, .. } | ExprError::KindMismatch { span, .. } => {
                Some(span.clone())
            }
            _ => None,
        }
    }
}
