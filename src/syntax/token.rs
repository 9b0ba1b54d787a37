//! Tokens and the CBC terminal alphabet.
//!
//! Terminal ids live in a small contiguous space. Binary operators occupy the
//! open interval between two sentinel ids so that [`is_binary_operator`] is a
//! range test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier shared by tokens and grammar symbols.
pub type TokenId = u32;

/// Byte range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Human-facing position of a token; columns are 1-based and inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Location {
    pub line: usize,
    pub begin_column: usize,
    pub end_column: usize,
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub lexeme: String,
    pub span: Span,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span, location: Location) -> Self {
        Self {
            id: kind.id(),
            lexeme: lexeme.into(),
            span,
            location,
        }
    }

    /// The CBC kind of this token, if the id belongs to the CBC alphabet.
    pub fn kind(&self) -> Option<TokenKind> {
        TokenKind::from_id(self.id)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.id == kind.id()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' <line: {}, col: {}:{}>",
            self.lexeme, self.location.line, self.location.begin_column, self.location.end_column
        )
    }
}

/// Terminal alphabet of the CBC language.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    EndOfFile,
    Identifier,
    IntegralNumber,
    ExpressionSeparator,
    ArgumentSeparator,
    BinaryOperatorsRangeBegin,
    Assignment,
    Addition,
    Subtraction,
    Multiplication,
    ShiftLeft,
    ShiftRight,
    BinaryOperatorsRangeEnd,
    Definition,
    ExternalDeclaration,
    BodyBegin,
    BodyEnd,
    OpenParentheses,
    CloseParentheses,
}

const ALL_KINDS: [TokenKind; 19] = [
    TokenKind::EndOfFile,
    TokenKind::Identifier,
    TokenKind::IntegralNumber,
    TokenKind::ExpressionSeparator,
    TokenKind::ArgumentSeparator,
    TokenKind::BinaryOperatorsRangeBegin,
    TokenKind::Assignment,
    TokenKind::Addition,
    TokenKind::Subtraction,
    TokenKind::Multiplication,
    TokenKind::ShiftLeft,
    TokenKind::ShiftRight,
    TokenKind::BinaryOperatorsRangeEnd,
    TokenKind::Definition,
    TokenKind::ExternalDeclaration,
    TokenKind::BodyBegin,
    TokenKind::BodyEnd,
    TokenKind::OpenParentheses,
    TokenKind::CloseParentheses,
];

impl TokenKind {
    pub const fn id(self) -> TokenId {
        self as TokenId
    }

    pub fn from_id(id: TokenId) -> Option<Self> {
        ALL_KINDS.get(id as usize).copied()
    }

    /// Fixed spelling of keyword and punctuation kinds.
    pub const fn spelling(self) -> Option<&'static str> {
        match self {
            Self::ExpressionSeparator => Some(";"),
            Self::ArgumentSeparator => Some(","),
            Self::Assignment => Some("="),
            Self::Addition => Some("+"),
            Self::Subtraction => Some("-"),
            Self::Multiplication => Some("*"),
            Self::ShiftLeft => Some("<<"),
            Self::ShiftRight => Some(">>"),
            Self::Definition => Some("def"),
            Self::ExternalDeclaration => Some("extern"),
            Self::BodyBegin => Some("{"),
            Self::BodyEnd => Some("}"),
            Self::OpenParentheses => Some("("),
            Self::CloseParentheses => Some(")"),
            _ => None,
        }
    }

    /// Operator kind spelled `lexeme`, if any.
    pub fn operator_from_lexeme(lexeme: &str) -> Option<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .filter(|kind| is_binary_operator(kind.id()))
            .find(|kind| kind.spelling() == Some(lexeme))
    }

    /// How diagnostics refer to this kind.
    pub fn describe(self) -> String {
        match self.spelling() {
            Some(spelling) => format!("'{}'", spelling),
            None => match self {
                Self::Identifier => "identifier".to_string(),
                Self::IntegralNumber => "integral number".to_string(),
                Self::EndOfFile => "EOF".to_string(),
                other => format!("{:?}", other),
            },
        }
    }
}

/// Cheap range test against the operator sentinels.
pub fn is_binary_operator(id: TokenId) -> bool {
    id > TokenKind::BinaryOperatorsRangeBegin.id() && id < TokenKind::BinaryOperatorsRangeEnd.id()
}
