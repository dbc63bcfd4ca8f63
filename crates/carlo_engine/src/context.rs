//! Per-evaluation scratch state.
//!
//! An [`ExecutionContext`] lives for one tuple delivery (or one immediate
//! evaluation) and is threaded by `&mut` through every evaluation call. It
//! owns the named values and tuples the script creates, the persistable
//! values fetched from native actors, the stop flag, and the runtime errors
//! recorded so far.

use carlo_foundation::{PersistableValue, Tuple, Value};
use carlo_language::{RuntimeError, RuntimeErrorCode, Span};
use indexmap::IndexMap;

use crate::dispatcher::FunctionDispatcher;
use crate::router::TupleRouter;

/// Scratch state for one evaluation pass.
pub struct ExecutionContext<'a> {
    dispatcher: &'a FunctionDispatcher,
    router: &'a dyn TupleRouter,
    current_actor: String,
    tuples: IndexMap<String, Tuple>,
    values: IndexMap<String, Value>,
    persistables: IndexMap<String, PersistableValue>,
    errors: Vec<RuntimeError>,
    stop: bool,
}

impl<'a> ExecutionContext<'a> {
    /// Creates an empty context.
    #[must_use]
    pub fn new(dispatcher: &'a FunctionDispatcher, router: &'a dyn TupleRouter) -> Self {
        Self {
            dispatcher,
            router,
            current_actor: String::new(),
            tuples: IndexMap::new(),
            values: IndexMap::new(),
            persistables: IndexMap::new(),
            errors: Vec::new(),
            stop: false,
        }
    }

    /// Sets the executing actor's name.
    #[must_use]
    pub fn with_actor(mut self, name: impl Into<String>) -> Self {
        self.current_actor = name.into();
        self
    }

    /// Seeds a named value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_value(name, value);
        self
    }

    /// Returns the dispatcher calls go through.
    #[must_use]
    pub const fn dispatcher(&self) -> &'a FunctionDispatcher {
        self.dispatcher
    }

    /// Returns the router sends go through.
    #[must_use]
    pub const fn router(&self) -> &'a dyn TupleRouter {
        self.router
    }

    /// Returns the executing actor's name.
    #[must_use]
    pub fn current_actor(&self) -> &str {
        &self.current_actor
    }

    /// Replaces the executing actor's name.
    pub fn set_current_actor(&mut self, name: impl Into<String>) {
        self.current_actor = name.into();
    }

    // -------------------------------------------------------------------------
    // Named values
    // -------------------------------------------------------------------------

    /// Returns the named value, if it exists.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the named value mutably, if it exists.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    /// Returns true if a value called `name` exists.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Creates or overwrites a named value.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes a named value.
    pub fn remove_value(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    // -------------------------------------------------------------------------
    // Named tuples
    // -------------------------------------------------------------------------

    /// Returns the named tuple, if it exists.
    #[must_use]
    pub fn tuple(&self, name: &str) -> Option<&Tuple> {
        self.tuples.get(name)
    }

    /// Returns the named tuple mutably, if it exists.
    pub fn tuple_mut(&mut self, name: &str) -> Option<&mut Tuple> {
        self.tuples.get_mut(name)
    }

    /// Returns true if a tuple called `name` exists.
    #[must_use]
    pub fn has_tuple(&self, name: &str) -> bool {
        self.tuples.contains_key(name)
    }

    /// Creates or overwrites a named tuple.
    pub fn insert_tuple(&mut self, name: impl Into<String>, tuple: Tuple) {
        self.tuples.insert(name.into(), tuple);
    }

    // -------------------------------------------------------------------------
    // Persistable values
    // -------------------------------------------------------------------------

    /// Returns the persistable value stored under `actor.name`.
    #[must_use]
    pub fn persistable(&self, key: &str) -> Option<&PersistableValue> {
        self.persistables.get(key)
    }

    /// Returns the persistable value stored under `actor.name` mutably.
    pub fn persistable_mut(&mut self, key: &str) -> Option<&mut PersistableValue> {
        self.persistables.get_mut(key)
    }

    /// Stores a freshly fetched persistable value, dropping any earlier copy
    /// without saving it.
    pub fn attach_persistable(&mut self, key: impl Into<String>, value: PersistableValue) {
        self.persistables.insert(key.into(), value);
    }

    // -------------------------------------------------------------------------
    // Control and errors
    // -------------------------------------------------------------------------

    /// Returns true once `stop` has run and no loop has cleared it yet.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stop
    }

    /// Raises the stop flag.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    /// Lowers the stop flag.
    pub fn clear_stop(&mut self) {
        self.stop = false;
    }

    /// Records a runtime error against `span`.
    pub fn error(&mut self, code: RuntimeErrorCode, span: Span) {
        let error = RuntimeError::new(code, span);
        tracing::debug!(actor = %self.current_actor, %error, "runtime error");
        self.errors.push(error);
    }

    /// Returns the runtime errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[RuntimeError] {
        &self.errors
    }

    /// Takes the recorded runtime errors, leaving none.
    pub fn take_errors(&mut self) -> Vec<RuntimeError> {
        std::mem::take(&mut self.errors)
    }
}
