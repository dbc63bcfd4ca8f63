//! Integration tests for the line lexer

use std::collections::VecDeque;

use carlo_language::{Lexer, Span, TokenKind, lex_source};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex_source(source).into_iter().map(|token| token.kind).collect()
}

// =============================================================================
// Lines
// =============================================================================

#[test]
fn every_line_ends_with_eol() {
    let tokens = lex_source("actor\n\nend");
    let eols: Vec<u32> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Eol)
        .map(|token| token.span.line)
        .collect();
    assert_eq!(eols, vec![0, 1, 2]);
}

#[test]
fn lexer_counts_lines_across_calls() {
    let mut lexer = Lexer::new();
    let mut tokens = VecDeque::new();
    lexer.lex("actor", &mut tokens);
    lexer.lex("end", &mut tokens);
    assert_eq!(lexer.line(), 2);
    assert_eq!(tokens[2].span, Span::new(1, 0, 3));

    lexer.reset();
    tokens.clear();
    lexer.lex("end", &mut tokens);
    assert_eq!(tokens[0].span, Span::new(0, 0, 3));
}

#[test]
fn trailing_carriage_return_is_dropped() {
    assert_eq!(kinds("end\r"), vec![TokenKind::End, TokenKind::Eol]);
}

// =============================================================================
// Pieces
// =============================================================================

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(
        kinds("actor Actor"),
        vec![TokenKind::Actor, TokenKind::Word("Actor".into()), TokenKind::Eol]
    );
}

#[test]
fn numbers_take_the_longest_numeric_prefix() {
    assert_eq!(
        kinds("-2.5 3abc"),
        vec![TokenKind::Float(-2.5), TokenKind::Float(3.0), TokenKind::Eol]
    );
}

#[test]
fn words_may_carry_paths() {
    assert_eq!(
        kinds("door.lock.@side"),
        vec![TokenKind::Word("door.lock.@side".into()), TokenKind::Eol]
    );
}

#[test]
fn quoted_strings_keep_inner_spaces() {
    let tokens = lex_source("sends Say text \"two  words\"");
    assert_eq!(tokens[3].kind, TokenKind::Quoted("two  words".into()));
    assert_eq!(tokens[3].span.column, 15);
}

#[test]
fn notes_swallow_keywords() {
    assert_eq!(kinds("note actor end"), vec![TokenKind::Note, TokenKind::Eol]);
}
