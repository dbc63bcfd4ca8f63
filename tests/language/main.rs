//! Integration tests for Layer 1: Language
//!
//! Tests for the line lexer, both parser modes, diagnostics, and the tree dump.

mod dump;
mod lexer;
mod parser;
