//! Integration tests for Layer 2: Engine
//!
//! Tests for program loading and delivery, evaluation semantics, and
//! promise round trips.

use std::cell::RefCell;
use std::rc::Rc;

use carlo_engine::Actor;
use carlo_foundation::Tuple;

mod delivery;
mod evaluation;
mod promises;

/// A native actor that keeps every tuple it is given.
pub struct Recorder {
    name: String,
    seen: RefCell<Vec<Tuple>>,
}

impl Recorder {
    /// Creates a recorder called `name`.
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            seen: RefCell::new(Vec::new()),
        })
    }

    /// Types of the tuples seen so far, in arrival order.
    pub fn types(&self) -> Vec<String> {
        self.seen
            .borrow()
            .iter()
            .map(|tuple| tuple.tuple_type().to_string())
            .collect()
    }

    /// The latest tuple of `tuple_type`.
    pub fn last(&self, tuple_type: &str) -> Option<Tuple> {
        self.seen
            .borrow()
            .iter()
            .rev()
            .find(|tuple| tuple.tuple_type() == tuple_type)
            .cloned()
    }

    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}

impl Actor for Recorder {
    fn actor_name(&self) -> String {
        self.name.clone()
    }

    fn accept(&self, tuple: &Tuple) -> bool {
        self.seen.borrow_mut().push(tuple.clone());
        true
    }
}
