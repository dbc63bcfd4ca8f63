//! Line lexer for Carlo.
//!
//! Carlo source is lexed one line at a time. Each call to [`Lexer::lex`]
//! appends that line's tokens plus an end-of-line marker to a shared queue
//! and advances the lexer's line counter, so the parser sees one continuous
//! stream with consistent line numbers.
//!
//! Lexing never fails. Words split on single spaces; a piece that is not a
//! keyword, a quoted string, or a word starting with a letter is read as a
//! number, taking its longest numeric prefix (or zero).

use std::collections::VecDeque;

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Line-at-a-time lexer.
#[derive(Debug, Default)]
pub struct Lexer {
    /// Line number given to the next lexed line (0-based).
    line: u32,
}

impl Lexer {
    /// Creates a lexer starting at line 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { line: 0 }
    }

    /// Returns the line number the next call to [`Lexer::lex`] will use.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Restarts line numbering from zero.
    pub fn reset(&mut self) {
        self.line = 0;
    }

    /// Lexes one line, appending its tokens and a trailing [`TokenKind::Eol`].
    pub fn lex(&mut self, input: &str, tokens: &mut VecDeque<Token>) {
        let text = input.strip_suffix('\n').unwrap_or(input);
        let text = text.strip_suffix('\r').unwrap_or(text);
        let line_len = char_len(text);

        let mut column = 0;
        let mut pieces = text.split(' ');
        while let Some(piece) = pieces.next() {
            if piece.is_empty() {
                column += 1;
                continue;
            }

            let (kind, len) = match TokenKind::keyword(piece) {
                Some(TokenKind::Note) => {
                    let span = Span::new(self.line, column, line_len.saturating_sub(column));
                    tokens.push_back(Token::new(TokenKind::Note, span));
                    column = line_len;
                    break;
                }
                Some(keyword) => (keyword, char_len(piece)),
                None if piece.starts_with('"') => quoted(piece, &mut pieces),
                None if piece.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                    (TokenKind::Word(piece.to_string()), char_len(piece))
                }
                None => (TokenKind::Float(parse_float(piece)), char_len(piece)),
            };

            tokens.push_back(Token::new(kind, Span::new(self.line, column, len)));
            column += len + 1;
        }

        tokens.push_back(Token::new(TokenKind::Eol, Span::new(self.line, column, 0)));
        self.line += 1;
    }
}

/// Lexes a whole program, one line per newline.
#[must_use]
pub fn lex_source(source: &str) -> VecDeque<Token> {
    let mut lexer = Lexer::new();
    let mut tokens = VecDeque::new();
    for line in source.lines() {
        lexer.lex(line, &mut tokens);
    }
    tokens
}

/// Joins pieces until one ends with a closing quote. Empty pieces are
/// joined too, so runs of spaces inside the quotes survive.
///
/// An unterminated string runs to the end of the line and keeps everything
/// after the opening quote.
fn quoted<'a>(first: &'a str, rest: &mut impl Iterator<Item = &'a str>) -> (TokenKind, u32) {
    let mut text = first.to_string();
    let mut last = first;
    let mut closed = true;
    while !last.ends_with('"') {
        let Some(piece) = rest.next() else {
            closed = false;
            break;
        };
        text.push(' ');
        text.push_str(piece);
        last = piece;
    }

    let len = char_len(&text);
    let inner = text.chars().skip(1);
    let payload: String = if closed {
        inner.take(len.saturating_sub(2) as usize).collect()
    } else {
        inner.collect()
    };
    (TokenKind::Quoted(payload), len)
}

/// Reads the longest numeric prefix of `piece`, or zero.
fn parse_float(piece: &str) -> f64 {
    piece
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| piece[..end].parse().ok())
        .unwrap_or(0.0)
}

#[allow(clippy::cast_possible_truncation)]
fn char_len(text: &str) -> u32 {
    text.chars().count() as u32
}
