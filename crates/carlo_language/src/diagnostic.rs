//! Script diagnostics: parse errors and runtime errors.
//!
//! Neither is a Rust error path. The parser collects [`ParseError`]s and
//! keeps going; the interpreter records [`RuntimeError`]s in its execution
//! context and reports failure upward as a plain `Option`. Both carry the
//! span of the offending token or node so the editor can point at it.

use std::fmt;

use thiserror::Error;

use crate::span::Span;
use crate::token::TokenKind;

/// What the parser expected but did not find.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParseErrorCode {
    /// Top level held something other than `actor`.
    ExpectedActor = 1,
    /// A non-first actor has no name.
    ExpectedActorName = 2,
    /// Trailing tokens where a line should end.
    ExpectedEol = 3,
    /// Actor body held something other than `receives`.
    ExpectedReceives = 4,
    /// `receives` or `creates tuple` without a type.
    ExpectedTupleType = 5,
    /// `from` without an actor name.
    ExpectedSourceActorName = 6,
    /// `as` without an alias.
    ExpectedTupleAlias = 7,
    /// Block not closed with `end`.
    ExpectedEnd = 8,
    /// Block held something that is not a statement.
    ExpectedStatement = 9,
    /// Reserved: `sends` without a type or name.
    ExpectedTupleTypeOrName = 10,
    /// A field or value name is missing.
    ExpectedValueName = 11,
    /// `sends` without `tuple` or a tuple type.
    ExpectedTupleOrTupleType = 12,
    /// `tuple` without a name.
    ExpectedTupleName = 13,
    /// `creates` without `tuple` or `value`.
    ExpectedTupleOrValue = 14,
    /// `each` without a loop variable.
    ExpectedArrayElementName = 15,
    /// `each` without `in`.
    ExpectedIn = 16,
    /// Unbalanced `(`.
    ExpectedClosingParenthesis = 17,
    /// Missing operand.
    ExpectedExpression = 18,
    /// `more`/`less` without `than`.
    ExpectedThan = 19,
    /// A function argument named twice.
    DuplicateArgumentName = 20,
    /// `with` not followed by an argument name.
    ExpectedArgumentName = 21,
}

impl ParseErrorCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ExpectedActor => "Expected \"actor\"",
            Self::ExpectedActorName => "Expected actor name",
            Self::ExpectedEol => "Expected end of line",
            Self::ExpectedReceives => "Expected \"receives\"",
            Self::ExpectedTupleType => "Expected tuple type",
            Self::ExpectedSourceActorName => "Expected source actor name",
            Self::ExpectedTupleAlias => "Expected tuple alias",
            Self::ExpectedEnd => "Expected \"end\"",
            Self::ExpectedStatement => "Expected statement",
            Self::ExpectedTupleTypeOrName => "Expected tuple type or tuple name",
            Self::ExpectedValueName => "Expected value name",
            Self::ExpectedTupleOrTupleType => "Expected \"tuple\" or tuple type",
            Self::ExpectedTupleName => "Expected tuple name",
            Self::ExpectedTupleOrValue => "Expected \"tuple\" or \"value\"",
            Self::ExpectedArrayElementName => "Expected array element name",
            Self::ExpectedIn => "Expected \"in\"",
            Self::ExpectedClosingParenthesis => "Expected closing ')'",
            Self::ExpectedExpression => "Expected expression",
            Self::ExpectedThan => "Expected \"than\"",
            Self::DuplicateArgumentName => "Duplicate argument name",
            Self::ExpectedArgumentName => "Expected argument name",
        }
    }
}

/// A syntax error at a token.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// The offending token.
    pub span: Span,
    /// The kind of the offending token.
    pub found: TokenKind,
}

impl fmt::Display for ParseError {
    /// Formats as `line,col: Error N: message, found token.` with 1-based
    /// positions. Duplicate argument errors omit the token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Error {}: {}",
            self.span,
            self.code.number(),
            self.code.message()
        )?;
        if self.code != ParseErrorCode::DuplicateArgumentName {
            write!(f, ", found {}.", self.found)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Why evaluation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RuntimeErrorCode {
    /// Reserved for operators the interpreter does not know.
    UnknownArithmeticOperator = 1,
    /// A call reached no native actor or inbuilt function.
    NoSuchFunction = 2,
    /// An assignment target did not resolve.
    NoSuchTupleOrValue = 3,
    /// A dotted name resolved to nothing.
    NoSuchTupleValueOrFunction = 4,
    /// Reserved for operators the interpreter does not know.
    UnknownLogicalOperator = 5,
    /// `creates tuple` over an existing name.
    TupleAlreadyExists = 6,
    /// `creates value` or `each` over an existing name.
    ValueAlreadyExists = 7,
    /// `each` over something that is not a list.
    ValueIsNotAList = 8,
    /// `sends tuple` naming no tuple.
    NoSuchTuple = 9,
    /// A persistable value's loader refused the save.
    UnableToSaveValue = 10,
    /// Arithmetic or ordering on a non-numeric operand.
    ValueIsNotANumber = 11,
    /// The router rejected a send.
    UnableToRouteTuple = 12,
}

impl RuntimeErrorCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownArithmeticOperator => "Unknown arithmetic operator",
            Self::NoSuchFunction => "No such function",
            Self::NoSuchTupleOrValue => "No such tuple or value",
            Self::NoSuchTupleValueOrFunction => "No such tuple, value or function",
            Self::UnknownLogicalOperator => "Unknown logical operator",
            Self::TupleAlreadyExists => "Tuple already exists",
            Self::ValueAlreadyExists => "Value already exists",
            Self::ValueIsNotAList => "Value is not a list",
            Self::NoSuchTuple => "No such tuple",
            Self::UnableToSaveValue => "Unable to save value",
            Self::ValueIsNotANumber => "Value is not a number",
            Self::UnableToRouteTuple => "Unable to route tuple",
        }
    }
}

/// An evaluation failure attributed to an AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{span}: Runtime error R{}: {}.", .code.number(), .code.message())]
pub struct RuntimeError {
    /// What went wrong.
    pub code: RuntimeErrorCode,
    /// The failing node.
    pub span: Span,
}

impl RuntimeError {
    /// Creates a runtime error.
    #[must_use]
    pub const fn new(code: RuntimeErrorCode, span: Span) -> Self {
        Self { code, span }
    }
}
