//! Lexer, parser, and syntax tree for the Carlo scripting language.
//!
//! This crate provides:
//! - [`Lexer`] - Line-at-a-time tokenisation with source spans
//! - [`Parser`] - Two-mode recursive-descent parser (tree building or highlighting)
//! - [`ast`] - The syntax tree, with tuple handlers shared through [`Shared`]
//! - [`ParseError`] and [`RuntimeError`] - Script diagnostics with stable codes
//! - [`Highlight`] - Editor colouring for every token
//! - [`dump`] - Deterministic debug dump of a parsed program

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod diagnostic;
pub mod dump;
pub mod highlight;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{
    ActorDef, ArithmeticOp, Block, ComparisonOp, CreateTarget, Expression, Identifier, LogicalOp,
    Program, SendPayload, Shared, Statement, TupleHandler,
};
pub use diagnostic::{ParseError, ParseErrorCode, RuntimeError, RuntimeErrorCode};
pub use dump::{dump_expression, dump_program};
pub use highlight::{Colour, Highlight, HighlightStyle};
pub use lexer::{Lexer, lex_source};
pub use parser::{ParseOutput, Parser, parse_source};
pub use span::Span;
pub use token::{Token, TokenKind};
