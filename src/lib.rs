//! Carlo - Embeddable actor scripting engine
//!
//! This crate re-exports all layers of the Carlo system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: carlo_runtime    - Host composition, editor highlighting, assets, value store
//! Layer 2: carlo_engine     - Interpreter, dispatcher, router, script actors, programs
//! Layer 1: carlo_language   - Line lexer, two-mode parser, syntax tree, diagnostics
//! Layer 0: carlo_foundation - Core types (Value, Tuple, PersistableValue, Error)
//! ```

pub use carlo_engine as engine;
pub use carlo_foundation as foundation;
pub use carlo_language as language;
pub use carlo_runtime as runtime;
