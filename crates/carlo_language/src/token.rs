//! Token types for Carlo.
//!
//! Tokens are the output of the lexer and input to the parser.

use std::fmt;

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and payload of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types for Carlo.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    /// A bare word starting with an ASCII letter.
    Word(String),
    /// A double-quoted string; the payload excludes the quotes.
    Quoted(String),
    /// Anything else, read permissively as a number.
    Float(f64),

    // Keywords
    /// `tuple`
    Tuple,
    /// `actor`
    Actor,
    /// `receives`
    Receives,
    /// `sends`
    Sends,
    /// `to`
    To,
    /// `on`
    On,
    /// `from`
    From,
    /// `as`
    As,
    /// `where`
    Where,
    /// `if`
    If,
    /// `else`
    Else,
    /// `end`
    End,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `is`
    Is,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `makes`
    Makes,
    /// `creates`
    Creates,
    /// `value`
    Value,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `note` and the rest of its line
    Note,
    /// `each`
    Each,
    /// `in`
    In,
    /// `stop`
    Stop,
    /// `more`
    More,
    /// `less`
    Less,
    /// `than`
    Than,
    /// `with`
    With,
    /// `while`
    While,

    // Meta
    /// End of a lexed line.
    Eol,
}

/// Keyword spellings, in the order the lexer tries them.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("tuple", TokenKind::Tuple),
    ("actor", TokenKind::Actor),
    ("receives", TokenKind::Receives),
    ("sends", TokenKind::Sends),
    ("to", TokenKind::To),
    ("on", TokenKind::On),
    ("from", TokenKind::From),
    ("as", TokenKind::As),
    ("where", TokenKind::Where),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("is", TokenKind::Is),
    ("not", TokenKind::Not),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("makes", TokenKind::Makes),
    ("creates", TokenKind::Creates),
    ("value", TokenKind::Value),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("note", TokenKind::Note),
    ("each", TokenKind::Each),
    ("in", TokenKind::In),
    ("stop", TokenKind::Stop),
    ("more", TokenKind::More),
    ("less", TokenKind::Less),
    ("than", TokenKind::Than),
    ("with", TokenKind::With),
    ("while", TokenKind::While),
];

impl TokenKind {
    /// Looks up a keyword by its exact, case-sensitive spelling.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, kind)| kind.clone())
    }

    /// Returns the name used for this kind in parse error messages.
    ///
    /// Keywords are shown as written; literals and the end-of-line marker get
    /// an underscored placeholder.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Word(_) => "_string_",
            Self::Quoted(_) => "_quotedString_",
            Self::Float(_) => "_float_",
            Self::Eol => "_eol_",
            keyword => KEYWORDS
                .iter()
                .find(|(_, kind)| kind == keyword)
                .map_or("_none_", |(spelling, _)| spelling),
        }
    }

    /// Returns the text of a word or quoted string.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Word(text) | Self::Quoted(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
