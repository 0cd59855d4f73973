use lazy_static::lazy_static;
use std::{collections::HashSet, fmt::Display};

use crate::Span;

/// Reserved macro names, matched case-sensitively on word boundaries.
pub const KEYWORDS: [&str; 15] = [
    "Frac", "Pdiff", "Diff", "Integ", "Sqrt", "Matrix", "Txt", "Piecewise", "Taylor", "Inf",
    "Bold", "Omega", "Om", "__", "Zeta",
];

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashSet<&'static str> = KEYWORDS.iter().copied().collect();
}

pub fn is_keyword(word: &str) -> bool {
    RESERVED_LOOKUP.contains(word)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Plain,
    Comment,
    String,
    InnerText,
    Keyword,
    Operator,
    Punctuation,
    Variable,
}

impl TokenKind {
    /// Class name used by the highlight markup.
    pub fn class_name(&self) -> &'static str {
        match self {
            TokenKind::Plain => "plain",
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::InnerText => "inner-text",
            TokenKind::Keyword => "keyword",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Variable => "variable",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Nested tokens, only populated for strings.
    pub inside: Vec<Token>,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }

    pub fn inner(&self, kind: TokenKind) -> Option<&Token> {
        self.inside.iter().find(|token| token.kind == kind)
    }
}
