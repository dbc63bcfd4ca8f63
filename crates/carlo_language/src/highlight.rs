//! Syntax highlight spans produced by the parser.

use crate::span::Span;

/// Terminal colours used by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    /// Plain text.
    Grey,
    /// Parse errors.
    Yellow,
    /// Carlo keywords.
    Cyan,
    /// Tuple-space keywords.
    Magenta,
    /// Comments.
    Brown,
    /// Tuple keys and argument names.
    White,
    /// Background of a token that failed at run time.
    Red,
}

/// What a highlighted token is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    /// Anything without a specific style.
    Plain,
    /// The token a parse error was reported at.
    Error,
    /// Language keywords: `actor`, `if`, `end`, operators...
    Keyword,
    /// Messaging keywords: `receives`, `sends`, `from`, `as`...
    Linda,
    /// `note` comments.
    Note,
    /// Keys in a sent tuple.
    TupleKey,
    /// Argument names after `with`.
    ArgumentName,
}

impl HighlightStyle {
    /// Returns the foreground colour for this style.
    #[must_use]
    pub const fn colour(self) -> Colour {
        match self {
            Self::Plain => Colour::Grey,
            Self::Error => Colour::Yellow,
            Self::Keyword => Colour::Cyan,
            Self::Linda => Colour::Magenta,
            Self::Note => Colour::Brown,
            Self::TupleKey | Self::ArgumentName => Colour::White,
        }
    }
}

/// A coloured span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    /// The token covered.
    pub span: Span,
    /// How it is coloured.
    pub style: HighlightStyle,
    /// Set when a runtime error was reported at this token.
    pub runtime_error: bool,
}

impl Highlight {
    /// Creates a highlight with no error background.
    #[must_use]
    pub const fn new(span: Span, style: HighlightStyle) -> Self {
        Self {
            span,
            style,
            runtime_error: false,
        }
    }

    /// Returns the foreground colour.
    #[must_use]
    pub const fn foreground(&self) -> Colour {
        self.style.colour()
    }

    /// Returns the background colour, if any.
    #[must_use]
    pub const fn background(&self) -> Option<Colour> {
        if self.runtime_error {
            Some(Colour::Red)
        } else {
            None
        }
    }
}
