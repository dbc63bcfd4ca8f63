//! Integration tests for Layer 3: Runtime
//!
//! Tests for the embedding host, on-disk assets and values, and the editor
//! highlighter.

mod editor;
mod host;
mod storage;
