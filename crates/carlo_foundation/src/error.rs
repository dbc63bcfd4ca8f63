//! Error types for the Carlo host API.
//!
//! Script-level failures (parse and runtime errors) are plain data collected
//! by the parser and the execution context. This module covers failures that
//! cross into the host: assets, persistence, serialization, and conversions.

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// The main error type for Carlo host operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

/// Result alias used throughout the Carlo crates.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an error for a word that does not hold a number.
    #[must_use]
    pub fn not_a_number(word: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotANumber(word.into()))
    }

    /// Creates an asset-not-found error.
    #[must_use]
    pub fn asset_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssetNotFound(name.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationError(message.into()))
    }

    /// Creates a persistence (load/save hook) error.
    #[must_use]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PersistenceError(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A value had a different type than the operation required.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected kind.
        expected: ValueKind,
        /// The kind actually found.
        actual: ValueKind,
    },

    /// A word could not be read as a number.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// No asset exists under the requested name.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Reading or writing an asset failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Encoding or decoding a value failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A value loader failed to load or save.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Asset, program, or actor name.
    pub source: Option<String>,
    /// Line number in source (0-based, as the lexer counts).
    pub line: Option<usize>,
    /// Column number in source (0-based).
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{}:{}", line + 1, col + 1)?;
            }
        }
        Ok(())
    }
}
