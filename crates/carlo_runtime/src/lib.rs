//! Host composition, editor support, and storage for Carlo.
//!
//! This crate provides:
//! - [`Host`] - Router, dispatcher, program manager, and value store built from one [`EngineConfig`]
//! - [`CarloHighlighter`] - Editor highlighting with parse and runtime error reports
//! - [`MemoryAssets`] and [`DirectoryAssets`] - Program source loaders
//! - [`ValueStore`] and [`StoreActor`] - `MessagePack`-backed persistable values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assets;
pub mod config;
pub mod editor;
pub mod host;
pub mod store;

pub use assets::{DirectoryAssets, MemoryAssets, PROGRAM_EXTENSION};
pub use config::EngineConfig;
pub use editor::{CarloHighlighter, HighlightReport};
pub use host::{Host, ImmediateError};
pub use store::{IMMEDIATE_CALLER, STORE_ACTOR, StoreActor, ValueStore};
