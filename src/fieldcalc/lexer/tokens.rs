//! Token definitions for the expression language

use logos::Logos;
use std::fmt;

/// Raw tokens as produced by logos, before plugin calls are folded.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("^")]
    Caret,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(".")]
    Period,
}

/// Tokens consumed by the parser.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Token {
    /// Numeric literal as written
    Number(String),
    True,
    False,
    Ident(String),
    /// A registered plugin function with its raw argument text. `arguments`
    /// runs from just after `(` through the matching `)`, and starts at byte
    /// `offset` of the source.
    PluginCall {
        name: String,
        arguments: String,
        offset: usize,
    },
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Caret,
    PipePipe,
    Bang,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    Question,
    Colon,
    Comma,
    Semicolon,
    OpenParen,
    CloseParen,
    Period,
}

impl Token {
    /// `,` and `;` both separate plugin arguments.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Comma | Token::Semicolon)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Number(_) | Token::True | Token::False)
    }
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Number(n) => Token::Number(n),
            RawToken::True => Token::True,
            RawToken::False => Token::False,
            RawToken::Ident(name) => Token::Ident(name),
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::Percent => Token::Percent,
            RawToken::Amp => Token::Amp,
            RawToken::AmpAmp => Token::AmpAmp,
            RawToken::Caret => Token::Caret,
            RawToken::PipePipe => Token::PipePipe,
            RawToken::Bang => Token::Bang,
            RawToken::Less => Token::Less,
            RawToken::Greater => Token::Greater,
            RawToken::LessEqual => Token::LessEqual,
            RawToken::GreaterEqual => Token::GreaterEqual,
            RawToken::EqualEqual => Token::EqualEqual,
            RawToken::BangEqual => Token::BangEqual,
            RawToken::Question => Token::Question,
            RawToken::Colon => Token::Colon,
            RawToken::Comma => Token::Comma,
            RawToken::Semicolon => Token::Semicolon,
            RawToken::OpenParen => Token::OpenParen,
            RawToken::CloseParen => Token::CloseParen,
            RawToken::Period => Token::Period,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Number(n) => n.as_str(),
            Token::Ident(name) => name.as_str(),
            Token::PluginCall {
                name, arguments, ..
            } => return write!(f, "{}({}", name, arguments),
            Token::True => "true",
            Token::False => "false",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Amp => "&",
            Token::AmpAmp => "&&",
            Token::Caret => "^",
            Token::PipePipe => "||",
            Token::Bang => "!",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::EqualEqual => "==",
            Token::BangEqual => "!=",
            Token::Question => "?",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Period => ".",
        };
        f.write_str(text)
    }
}
