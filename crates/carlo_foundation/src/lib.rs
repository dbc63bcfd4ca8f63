//! Core values, tuples, and errors for Carlo.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type scripts and native actors exchange
//! - [`Tuple`] - Addressed, typed key-value messages with reserved routing keys
//! - [`PersistableValue`] - A value paired with the [`ValueLoader`] that saves it
//! - [`Error`] - Host-facing error types with context
//! - Ordered collections ([`ValueList`], [`ValueMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

#[cfg(feature = "serde")]
pub mod cipher;
pub mod collections;
pub mod error;
pub mod loader;
pub mod tuple;
pub mod value;

#[cfg(feature = "serde")]
pub use cipher::{Cipher, XorCipher};
pub use collections::{ValueList, ValueMap};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use loader::{MemoryLoader, PersistableValue, ValueLoader};
pub use tuple::Tuple;
pub use value::{NOTHING, Value, ValueKind};
