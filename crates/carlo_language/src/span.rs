//! Source location tracking.
//!
//! Carlo is lexed one line at a time, so a `Span` is a (line, column,
//! length) triple rather than a byte range. Lines and columns are 0-based;
//! anything shown to a person adds one.

use std::fmt;

/// A run of characters on one source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
    /// Length in characters. End-of-line markers have length zero.
    pub len: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(line: u32, column: u32, len: u32) -> Self {
        Self { line, column, len }
    }

    /// Returns true if this span covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `other` starts at the same line and column.
    #[must_use]
    pub const fn starts_with(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line + 1, self.column + 1)
    }
}
