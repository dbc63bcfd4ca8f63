//! Function dispatch from scripts to native actors.
//!
//! A call addressed to an actor (`door.open with ...`) is forwarded to that
//! actor's [`Actor::perform`]. An unaddressed call (`sine with x 1`) goes to
//! the [`inbuilt`](crate::inbuilt) table. Actors register themselves and are
//! held weakly, so a dropped actor simply stops answering.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use carlo_foundation::{PersistableValue, Value};
use indexmap::IndexMap;

use crate::actor::Actor;
use crate::inbuilt;

/// Named call arguments in source order.
pub type Arguments = IndexMap<String, Value>;

/// Routes function calls and persistable-value requests by actor name.
#[derive(Default)]
pub struct FunctionDispatcher {
    actors: RefCell<HashMap<String, Weak<dyn Actor>>>,
}

impl FunctionDispatcher {
    /// Creates a dispatcher with no registered actors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `actor` under its current name, replacing any earlier
    /// registration of that name.
    pub fn register(&self, actor: &Rc<dyn Actor>) {
        let name = actor.actor_name();
        tracing::debug!(actor = %name, "registered with dispatcher");
        self.actors.borrow_mut().insert(name, Rc::downgrade(actor));
    }

    /// Registers `actor` unless a live actor already holds its name.
    /// Returns true if it was registered.
    pub fn register_if_vacant(&self, actor: &Rc<dyn Actor>) -> bool {
        let name = actor.actor_name();
        if self.is_registered(&name) {
            tracing::debug!(actor = %name, "dispatcher name already taken");
            return false;
        }
        self.register(actor);
        true
    }

    /// Removes `actor`'s registration. A later registration of the same name
    /// by a different actor is left alone.
    pub fn deregister(&self, actor: &Rc<dyn Actor>) {
        let name = actor.actor_name();
        let mut actors = self.actors.borrow_mut();
        let registered = actors
            .get(&name)
            .is_some_and(|weak| Weak::ptr_eq(weak, &Rc::downgrade(actor)));
        if registered {
            actors.remove(&name);
        }
    }

    /// Returns true if a live actor is registered under `name`.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Calls `function`. An empty `actor` selects the inbuilt functions.
    ///
    /// Returns `None` if nobody answers.
    pub fn dispatch(
        &self,
        actor: &str,
        function: &str,
        args: &Arguments,
        caller: &str,
    ) -> Option<Value> {
        if actor.is_empty() {
            return inbuilt::perform(function, args);
        }
        let target = self.lookup(actor)?;
        let result = target.perform(function, args, caller);
        if result.is_none() {
            tracing::debug!(actor, function, caller, "native actor declined call");
        }
        result
    }

    /// Fetches the persistable value `name` owned by `actor`. There are no
    /// inbuilt persistable values.
    pub fn persistable_value(
        &self,
        actor: &str,
        name: &str,
        caller: &str,
    ) -> Option<PersistableValue> {
        if actor.is_empty() {
            return None;
        }
        self.lookup(actor)?.persistable_value(name, caller)
    }

    // The registry borrow is released before the actor is called so that
    // actors may register or deregister others while performing.
    fn lookup(&self, name: &str) -> Option<Rc<dyn Actor>> {
        self.actors.borrow().get(name).and_then(Weak::upgrade)
    }
}
