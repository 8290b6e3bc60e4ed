//! Argument scanning for plugin functions
//!
//! A plugin call receives its argument text raw, from just after the opening
//! parenthesis through the matching `)`. The default scanner walks that text
//! slot by slot: every slot but the last ends at `,` or `;`, the last at `)`.

use super::function::PluginContext;
use crate::fieldcalc::error::{ExprError, Result};
use crate::fieldcalc::lexer::{tokenize, Token};
use crate::fieldcalc::parser::Terminator;
use crate::fieldcalc::value::{Field, FieldType};
use serde::{Deserialize, Serialize};

/// What one argument slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentSpec {
    /// A single number, possibly computed: `0.5`, `2*pi`.
    Scalar,
    /// A bare identifier, passed through as a name.
    Word,
    /// A full expression evaluated to a field of this type.
    Field(FieldType),
}

/// A scanned argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginArgument {
    Scalar(f64),
    Word(String),
    Field(Field),
}

impl PluginArgument {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PluginArgument::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            PluginArgument::Word(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            PluginArgument::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn into_field(self) -> Option<Field> {
        match self {
            PluginArgument::Field(f) => Some(f),
            _ => None,
        }
    }
}

/// Scan `text` according to `spec`. Errors carry spans relative to `text`.
pub fn scan_arguments(
    context: &PluginContext<'_>,
    spec: &[ArgumentSpec],
    text: &str,
) -> Result<Vec<PluginArgument>> {
    if spec.is_empty() {
        let end = context.expect_terminator(text, Terminator::Close)?;
        ensure_consumed(text, end)?;
        return Ok(Vec::new());
    }

    let mut position = 0;
    let mut arguments = Vec::with_capacity(spec.len());
    for (i, slot) in spec.iter().enumerate() {
        let terminator = if i + 1 == spec.len() {
            Terminator::Close
        } else {
            Terminator::Comma
        };
        let rest = &text[position..];
        let (argument, consumed) = match slot {
            ArgumentSpec::Scalar => context
                .evaluate_scalar_argument(rest, terminator)
                .map(|(v, end)| (PluginArgument::Scalar(v), end)),
            ArgumentSpec::Word => {
                scan_word(rest, terminator).map(|(w, end)| (PluginArgument::Word(w), end))
            }
            ArgumentSpec::Field(field_type) => context
                .evaluate_argument(rest, *field_type, terminator)
                .map(|(f, end)| (PluginArgument::Field(f), end)),
        }
        .map_err(|err| err.shifted(position))?;
        arguments.push(argument);
        position += consumed;
    }
    ensure_consumed(text, position)?;
    Ok(arguments)
}

/// An identifier followed by `terminator`. Answers the name and the offset
/// just past the terminator.
pub fn scan_word(text: &str, terminator: Terminator) -> Result<(String, usize)> {
    let tokens = tokenize(text, |_| false)?;
    let mut tokens = tokens.into_iter();
    let (name, span) = match tokens.next() {
        Some((Token::Ident(name), span)) => (name, span),
        Some((token, span)) => {
            return Err(ExprError::syntax(
                "expected a name",
                span,
                Some(token.to_string()),
            ))
        }
        None => return Err(ExprError::syntax("expected a name", text.len()..text.len(), None)),
    };
    match tokens.next() {
        Some((token, close)) if ends_argument(&token, terminator) => Ok((name, close.end)),
        Some((token, span)) => Err(ExprError::syntax(
            format!("expected {} after '{name}'", describe(terminator)),
            span,
            Some(token.to_string()),
        )),
        None => Err(ExprError::syntax(
            format!("expected {} after '{name}'", describe(terminator)),
            span.end..span.end,
            None,
        )),
    }
}

fn ends_argument(token: &Token, terminator: Terminator) -> bool {
    match terminator {
        Terminator::Comma => token.is_separator(),
        Terminator::Close => *token == Token::CloseParen,
    }
}

fn describe(terminator: Terminator) -> &'static str {
    match terminator {
        Terminator::Comma => "',' or ';'",
        Terminator::Close => "')'",
    }
}

fn ensure_consumed(text: &str, end: usize) -> Result<()> {
    let rest = &text[end..];
    match rest.find(|c: char| !c.is_whitespace()) {
        None => Ok(()),
        Some(at) => Err(ExprError::syntax(
            "unexpected text after the closing ')'",
            end + at..text.len(),
            Some(rest.trim().to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_word() {
        assert_eq!(
            scan_word(" rho , 3)", Terminator::Comma),
            Ok(("rho".to_string(), 6))
        );
        assert_eq!(scan_word("rho;", Terminator::Comma), Ok(("rho".to_string(), 4)));
        assert_eq!(scan_word("rho)", Terminator::Close), Ok(("rho".to_string(), 4)));
    }

    #[test]
    fn test_scan_word_errors() {
        assert!(matches!(
            scan_word("2)", Terminator::Close),
            Err(ExprError::Syntax { .. })
        ));
        assert!(matches!(
            scan_word("rho, x)", Terminator::Close),
            Err(ExprError::Syntax { span, .. }) if span == (3..4)
        ));
        assert!(matches!(
            scan_word("rho", Terminator::Close),
            Err(ExprError::Syntax { span, .. }) if span == (3..3)
        ));
    }

    #[test]
    fn test_ensure_consumed() {
        assert_eq!(ensure_consumed("a)  ", 2), Ok(()));
        assert!(matches!(
            ensure_consumed("a) b", 2),
            Err(ExprError::Syntax { span, .. }) if span == (3..4)
        ));
    }

    #[test]
    fn test_argument_accessors() {
        assert_eq!(PluginArgument::Scalar(2.0).as_scalar(), Some(2.0));
        assert_eq!(PluginArgument::Word("rho".into()).as_word(), Some("rho"));
        assert!(PluginArgument::Scalar(2.0).as_field().is_none());
    }
}
