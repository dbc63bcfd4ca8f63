//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Tuple, persistable values, and encryption.

mod persistence;
mod tuples;
mod values;
