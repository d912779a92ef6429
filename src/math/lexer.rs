use super::ast::{BinaryOperator, UnaryOperator};
use crate::common::*;
use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Integer(Int),
    #[regex(r"([0-9]+\.[0-9]+)|(\.[0-9]+)", |lex| lex.slice().parse())]
    Float(Float),

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    #[token("==")]
    #[token("===")]
    EqualEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub const UNARY_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const COMPARISON_OPS: &'static [Self] = &[
        Self::LessThan,
        Self::GreaterThan,
        Self::LessEqual,
        Self::GreaterEqual,
        Self::EqualEqual,
    ];

    pub const ADDITION_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const MULTIPLICATION_OPS: &'static [Self] = &[Self::Star, Self::Slash];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer(_) => "<integer>",
            Float(_) => "<float>",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Question => "'?'",
            Colon => "':'",
            EqualEqual => "'=='",
            GreaterEqual => "'>='",
            LessEqual => "'<='",
            LessThan => "'<'",
            GreaterThan => "'>'",
            Error => "<error>",
        }
    }

    pub fn as_unary_op(&self) -> Option<UnaryOperator> {
        use UnaryOperator::*;
        Some(match self {
            Self::Plus => Pos,
            Self::Minus => Neg,
            _ => return None,
        })
    }

    pub fn as_binary_op(&self) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            Self::LessThan => Lt,
            Self::GreaterThan => Gt,
            Self::LessEqual => Le,
            Self::GreaterEqual => Ge,
            Self::EqualEqual => Eq,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
