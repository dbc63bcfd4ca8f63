//! Interpreter and runtime plumbing for Carlo scripts.
//!
//! This crate provides:
//! - [`ExecutionContext`] - Per-evaluation named values, tuples, stop flag, and errors
//! - [`Evaluate`] and [`Assignable`] - Tree-walking evaluation of parsed scripts
//! - [`FunctionDispatcher`] - Calls from scripts into native actors and inbuilt functions
//! - [`TupleRouter`] and [`LocalRouter`] - Tuple delivery between actors
//! - [`ScriptActor`] - Actors built from parsed programs, sharing handlers across clones
//! - [`ProgramManager`] - Loading, template cloning, and unloading of programs
//! - [`Promise`] and [`Future`] - Poll-driven tuple round trips

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod asset;
pub mod context;
pub mod dispatcher;
pub mod eval;
pub mod handler;
pub mod inbuilt;
pub mod program;
pub mod promise;
pub mod router;

pub use actor::{Actor, ScriptActor};
pub use asset::{AssetLoader, AssetLoaderFactory, Coordinates, DEFAULT_READ_CHUNK, read_line};
pub use context::ExecutionContext;
pub use dispatcher::{Arguments, FunctionDispatcher};
pub use eval::{Assignable, Evaluate, Place, Root, is_true};
pub use handler::HandleTuple;
pub use program::{LOAD_TUPLE, ProgramManager, SYSTEM_ACTOR, UNLOAD_TUPLE};
pub use promise::{Future, Promise};
pub use router::{DEFAULT_MAX_ROUTE_DEPTH, LocalRouter, RoutingCriteria, TupleRouter};
