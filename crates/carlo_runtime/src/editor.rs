//! Syntax highlighting for the program editor.
//!
//! The editor feeds screen lines to [`CarloHighlighter::line`] as it draws
//! them, then asks for a [`HighlightReport`]. A logical line that wraps over
//! several screen lines is fed several times with the same logical number;
//! those pieces are lexed as one line.

use std::collections::VecDeque;

use carlo_engine::ProgramManager;
use carlo_language::{Highlight, Lexer, Parser, RuntimeError, Token, TokenKind};

/// What the editor shows for one pass over a program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightReport {
    /// One coloured span per token, in source order.
    pub highlights: Vec<Highlight>,
    /// Formatted parse errors.
    pub parse_errors: Vec<String>,
    /// Formatted runtime errors of the loaded program, if the text is
    /// unmodified.
    pub runtime_errors: Vec<String>,
}

/// Highlighter for Carlo programs.
#[derive(Debug, Default)]
pub struct CarloHighlighter {
    lexer: Lexer,
    tokens: VecDeque<Token>,
    previous_line: Option<usize>,
}

impl CarloHighlighter {
    /// Creates a highlighter with nothing fed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one screen line belonging to logical line `logical_line`.
    pub fn line(&mut self, text: &str, logical_line: usize) {
        if self.previous_line == Some(logical_line)
            && self.tokens.back().is_some_and(|token| token.kind == TokenKind::Eol)
        {
            self.tokens.pop_back();
        }
        self.lexer.lex(text, &mut self.tokens);
        self.previous_line = Some(logical_line);
    }

    /// Highlights everything fed since the last call and starts over.
    ///
    /// Runtime errors of program `instance` are only reported when the text
    /// is not `modified`, since their positions refer to the loaded source.
    /// The first highlight matching each error's column and length, on the
    /// error's line or later, is flagged so the editor paints it red.
    pub fn highlight(
        &mut self,
        manager: &ProgramManager,
        instance: &str,
        modified: bool,
    ) -> HighlightReport {
        let tokens = std::mem::take(&mut self.tokens);
        self.lexer.reset();
        self.previous_line = None;

        let output = Parser::new(tokens, false).parse();
        let mut report = HighlightReport {
            highlights: output.highlights,
            parse_errors: output.errors.iter().map(ToString::to_string).collect(),
            runtime_errors: Vec::new(),
        };

        if !modified {
            for error in manager.runtime_errors(instance) {
                report.runtime_errors.push(error.to_string());
                mark(&mut report.highlights, &error);
            }
        }
        report
    }
}

// Screen lines run ahead of program lines once anything wraps, so the line
// only has to be at or after the error's.
fn mark(highlights: &mut [Highlight], error: &RuntimeError) {
    let span = error.span;
    if let Some(highlight) = highlights.iter_mut().find(|highlight| {
        highlight.span.line >= span.line
            && highlight.span.column == span.column
            && highlight.span.len == span.len
    }) {
        highlight.runtime_error = true;
    }
}
