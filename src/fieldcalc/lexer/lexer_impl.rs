//! Core tokenization for the expression lexer
//!
//! Raw tokens come straight from logos. Identifiers that `is_plugin` accepts
//! and that are followed by `(` are folded into one [`Token::PluginCall`]
//! holding the unparsed argument text.

use crate::fieldcalc::error::{ExprError, Result, Span};
use crate::fieldcalc::lexer::tokens::{RawToken, Token};
use logos::Logos;

/// Tokenize source text with byte spans.
pub fn tokenize(source: &str, is_plugin: impl Fn(&str) -> bool) -> Result<Vec<(Token, Span)>> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|_| {
            ExprError::syntax(
                "unrecognized character",
                span.clone(),
                Some(source[span.clone()].to_string()),
            )
        })?;

        if let RawToken::Ident(name) = &raw {
            if is_plugin(name) {
                let rest = lexer.remainder();
                let gap = rest.len() - rest.trim_start().len();
                if rest[gap..].starts_with('(') {
                    let open = span.end + gap;
                    let close = matching_close(source, open)?;
                    tokens.push((
                        Token::PluginCall {
                            name: name.clone(),
                            arguments: source[open + 1..=close].to_string(),
                            offset: open + 1,
                        },
                        span.start..close + 1,
                    ));
                    lexer.bump(close + 1 - span.end);
                    continue;
                }
            }
        }

        tokens.push((Token::from(raw), span));
    }

    Ok(tokens)
}

/// Byte index of the `)` matching the `(` at `open`.
fn matching_close(source: &str, open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, c) in source[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + i);
                }
            }
            _ => {}
        }
    }
    Err(ExprError::syntax(
        "unbalanced parentheses in plugin function arguments",
        open..source.len(),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_plugins(_: &str) -> bool {
        false
    }

    fn strip(tokens: Vec<(Token, Span)>) -> Vec<Token> {
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_tokenize_with_spans() {
        let tokens = tokenize("2*mag(U)", no_plugins).expect("tokens");
        insta::assert_debug_snapshot!(tokens, @r###"
        [
            (
                Number(
                    "2",
                ),
                0..1,
            ),
            (
                Star,
                1..2,
            ),
            (
                Ident(
                    "mag",
                ),
                2..5,
            ),
            (
                OpenParen,
                5..6,
            ),
            (
                Ident(
                    "U",
                ),
                6..7,
            ),
            (
                CloseParen,
                7..8,
            ),
        ]
        "###);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("   ", no_plugins), Ok(vec![]));
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("p # 2", no_plugins).unwrap_err();
        assert_eq!(
            err,
            ExprError::Syntax {
                message: "unrecognized character".into(),
                span: 2..3,
                found: Some("#".into()),
            }
        );
    }

    #[test]
    fn test_plugin_call_is_folded() {
        let tokens = tokenize("1 + rho (O2; mag(U)) * 2", |name| name == "rho").expect("tokens");
        assert_eq!(tokens[2].1, 4..20);
        assert_eq!(
            tokens[2].0,
            Token::PluginCall {
                name: "rho".into(),
                arguments: "O2; mag(U))".into(),
                offset: 9,
            }
        );
        assert_eq!(
            strip(tokens[3..].to_vec()),
            vec![Token::Star, Token::Number("2".into())]
        );
    }

    #[test]
    fn test_plugin_name_without_call_stays_identifier() {
        let tokens = tokenize("rho + 1", |name| name == "rho").expect("tokens");
        assert_eq!(tokens[0].0, Token::Ident("rho".into()));
    }

    #[test]
    fn test_unbalanced_plugin_call() {
        let err = tokenize("rho(a, (b)", |name| name == "rho").unwrap_err();
        assert_eq!(err.span(), Some(3..10));
    }
}
