//! Tuple routing.
//!
//! The interpreter only needs the [`TupleRouter`] boundary: send a tuple,
//! know the local machine id, and (de)register actors together with the
//! routing criteria they want. [`LocalRouter`] is an in-process router that
//! delivers synchronously to registered actors.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use carlo_foundation::Tuple;

use crate::actor::Actor;

/// Default limit on nested `route` calls.
pub const DEFAULT_MAX_ROUTE_DEPTH: usize = 32;

/// Sends tuples between actors.
pub trait TupleRouter {
    /// Returns the id of the machine this router runs on.
    fn my_id(&self) -> String;

    /// Routes `tuple`. Returns false if it could not be routed.
    fn route(&self, tuple: Tuple) -> bool;

    /// Starts delivering tuples to `actor`.
    fn register_actor(&self, actor: &Rc<dyn Actor>);

    /// Stops delivering tuples to `actor`.
    fn deregister_actor(&self, actor: &Rc<dyn Actor>);

    /// Asks for tuples matching `criteria` to be routed here.
    fn add_routing_criteria(&self, criteria: RoutingCriteria);
}

/// Which tuples a subscriber wants.
///
/// A tuple matches if its type, destination id, or destination actor is one
/// of those listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingCriteria {
    /// Accepted tuple types.
    pub types: Vec<String>,
    /// Accepted destination machine ids.
    pub destination_ids: Vec<String>,
    /// Accepted destination actor names.
    pub destination_actors: Vec<String>,
}

impl RoutingCriteria {
    /// Criteria matching tuples addressed to `actor`.
    #[must_use]
    pub fn for_actor(actor: impl Into<String>) -> Self {
        Self {
            destination_actors: vec![actor.into()],
            ..Self::default()
        }
    }

    /// Criteria matching tuples of `tuple_type`.
    #[must_use]
    pub fn for_type(tuple_type: impl Into<String>) -> Self {
        Self {
            types: vec![tuple_type.into()],
            ..Self::default()
        }
    }

    /// Returns true if `tuple` matches.
    #[must_use]
    pub fn matches(&self, tuple: &Tuple) -> bool {
        let listed = |list: &[String], value: &str| list.iter().any(|item| item == value);
        listed(&self.types, tuple.tuple_type())
            || listed(&self.destination_ids, tuple.destination_id())
            || listed(&self.destination_actors, tuple.destination_actor())
    }
}

/// In-process router.
///
/// Delivers each tuple first to the monitor (if any), then to every
/// registered actor whose name equals the tuple's destination actor, or to
/// every actor when the destination is empty. Tuples addressed to another
/// machine cannot be routed.
pub struct LocalRouter {
    my_id: String,
    actors: RefCell<Vec<Weak<dyn Actor>>>,
    monitor: RefCell<Option<Weak<dyn Actor>>>,
    criteria: RefCell<Vec<RoutingCriteria>>,
    depth: Cell<usize>,
    max_depth: usize,
}

impl LocalRouter {
    /// Creates a router for machine `my_id`.
    #[must_use]
    pub fn new(my_id: impl Into<String>) -> Self {
        Self {
            my_id: my_id.into(),
            actors: RefCell::new(Vec::new()),
            monitor: RefCell::new(None),
            criteria: RefCell::new(Vec::new()),
            depth: Cell::new(0),
            max_depth: DEFAULT_MAX_ROUTE_DEPTH,
        }
    }

    /// Sets the nested routing limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Installs the actor that sees every routed tuple first.
    pub fn register_monitor(&self, monitor: &Rc<dyn Actor>) {
        *self.monitor.borrow_mut() = Some(Rc::downgrade(monitor));
    }

    /// Removes the monitor.
    pub fn deregister_monitor(&self) {
        *self.monitor.borrow_mut() = None;
    }

    /// Returns the number of live registered actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Returns the routing criteria received so far.
    #[must_use]
    pub fn criteria(&self) -> Vec<RoutingCriteria> {
        self.criteria.borrow().clone()
    }

    /// Returns true if any recorded criteria match `tuple`.
    #[must_use]
    pub fn is_wanted(&self, tuple: &Tuple) -> bool {
        self.criteria.borrow().iter().any(|criteria| criteria.matches(tuple))
    }

    fn deliver(&self, tuple: &Tuple) -> bool {
        let monitor = self.monitor.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(monitor) = monitor {
            monitor.accept(tuple);
        }

        // Snapshot so actors may (de)register others while handling.
        let actors: Vec<Rc<dyn Actor>> = self
            .actors
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        let destination = tuple.destination_actor();
        let mut handled = false;
        for actor in actors {
            if destination.is_empty() || actor.actor_name() == destination {
                handled |= actor.accept(tuple);
            }
        }
        handled
    }
}

impl TupleRouter for LocalRouter {
    fn my_id(&self) -> String {
        self.my_id.clone()
    }

    fn route(&self, tuple: Tuple) -> bool {
        let destination_id = tuple.destination_id();
        if !destination_id.is_empty() && destination_id != self.my_id {
            tracing::warn!(%tuple, "no route to remote machine");
            return false;
        }

        let depth = self.depth.get();
        if depth >= self.max_depth {
            tracing::warn!(%tuple, depth, "routing depth exceeded");
            return false;
        }

        self.depth.set(depth + 1);
        let handled = self.deliver(&tuple);
        self.depth.set(depth);

        if !handled {
            tracing::debug!(%tuple, "tuple not handled");
        }
        true
    }

    fn register_actor(&self, actor: &Rc<dyn Actor>) {
        let mut actors = self.actors.borrow_mut();
        actors.retain(|weak| weak.strong_count() > 0);
        actors.push(Rc::downgrade(actor));
    }

    fn deregister_actor(&self, actor: &Rc<dyn Actor>) {
        let target = Rc::downgrade(actor);
        let mut actors = self.actors.borrow_mut();
        if let Some(index) = actors.iter().position(|weak| Weak::ptr_eq(weak, &target)) {
            actors.remove(index);
        }
    }

    fn add_routing_criteria(&self, criteria: RoutingCriteria) {
        let mut recorded = self.criteria.borrow_mut();
        if recorded.contains(&criteria) {
            return;
        }
        tracing::trace!(?criteria, "routing criteria added");
        recorded.push(criteria);
    }
}
