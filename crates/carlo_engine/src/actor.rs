//! Actors: native ones implement [`Actor`] directly, scripted ones are
//! [`ScriptActor`]s built from parsed [`ActorDef`]s.

use std::cell::RefCell;
use std::rc::Rc;

use carlo_foundation::{PersistableValue, Tuple, Value};
use carlo_language::{ActorDef, RuntimeError, Shared, Span, TupleHandler};

use crate::context::ExecutionContext;
use crate::dispatcher::{Arguments, FunctionDispatcher};
use crate::eval::Evaluate;
use crate::handler::HandleTuple;
use crate::router::{RoutingCriteria, TupleRouter};

/// Anything tuples can be delivered to and functions called on.
pub trait Actor {
    /// Returns the name tuples and calls are addressed to.
    fn actor_name(&self) -> String;

    /// Offers a tuple. Returns true if the actor handled it.
    fn accept(&self, tuple: &Tuple) -> bool;

    /// Runs `function` on behalf of actor `caller`. `None` means the actor
    /// has no such function or refused the arguments.
    fn perform(&self, _function: &str, _args: &Arguments, _caller: &str) -> Option<Value> {
        None
    }

    /// Hands out the persistable value `name` to actor `caller`.
    fn persistable_value(&self, _name: &str, _caller: &str) -> Option<PersistableValue> {
        None
    }
}

/// An actor whose behaviour is a list of parsed tuple handlers.
///
/// Handlers are shared with every actor cloned from the same template; see
/// [`ScriptActor::duplicate`].
pub struct ScriptActor {
    name: RefCell<String>,
    handlers: Vec<Shared<TupleHandler>>,
    runtime_errors: RefCell<Vec<Vec<RuntimeError>>>,
    dispatcher: Rc<FunctionDispatcher>,
    router: Rc<dyn TupleRouter>,
    span: Span,
}

impl ScriptActor {
    /// Builds an actor from its parsed definition.
    #[must_use]
    pub fn from_def(
        def: &ActorDef,
        dispatcher: Rc<FunctionDispatcher>,
        router: Rc<dyn TupleRouter>,
    ) -> Self {
        Self {
            name: RefCell::new(def.name.clone()),
            handlers: def.handlers.clone(),
            runtime_errors: RefCell::new(vec![Vec::new(); def.handlers.len()]),
            dispatcher,
            router,
            span: def.span,
        }
    }

    /// Returns a copy sharing this actor's handlers, with no runtime errors
    /// recorded. The copy is not registered anywhere.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            handlers: self.handlers.clone(),
            runtime_errors: RefCell::new(vec![Vec::new(); self.handlers.len()]),
            dispatcher: Rc::clone(&self.dispatcher),
            router: Rc::clone(&self.router),
            span: self.span,
        }
    }

    /// Returns the actor's current name.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    /// Renames the actor. Register after renaming, not before.
    pub fn rename(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
    }

    /// Returns the handlers in source order.
    #[must_use]
    pub fn handlers(&self) -> &[Shared<TupleHandler>] {
        &self.handlers
    }

    /// Returns the `actor` keyword's span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Registers with the router and the dispatcher, and asks the router
    /// for tuples addressed to this actor or of any handled type.
    ///
    /// The dispatcher slot is only taken if no live actor holds the name,
    /// so a program never shadows a native actor.
    pub fn register(this: &Rc<Self>) {
        let actor: Rc<dyn Actor> = this.clone();
        this.router.register_actor(&actor);
        this.dispatcher.register_if_vacant(&actor);

        this.router
            .add_routing_criteria(RoutingCriteria::for_actor(this.name()));
        for handler in &this.handlers {
            this.router
                .add_routing_criteria(RoutingCriteria::for_type(handler.tuple_type.as_str()));
        }
    }

    /// Undoes [`ScriptActor::register`]. Routing criteria stay with the router.
    pub fn deregister(this: &Rc<Self>) {
        let actor: Rc<dyn Actor> = this.clone();
        this.router.deregister_actor(&actor);
        this.dispatcher.deregister(&actor);
    }

    /// Runs the first handler's block in `ctx` without matching a tuple.
    ///
    /// Returns `None` if there is no handler or the block failed.
    pub fn eval_one(&self, ctx: &mut ExecutionContext<'_>) -> Option<Value> {
        let handler = self.handlers.first()?;
        ctx.set_current_actor(self.name());
        handler.block.eval(ctx)
    }

    /// Returns the errors of the latest run of each handler, in handler
    /// order.
    #[must_use]
    pub fn runtime_errors(&self) -> Vec<RuntimeError> {
        self.runtime_errors.borrow().concat()
    }
}

impl Actor for ScriptActor {
    fn actor_name(&self) -> String {
        self.name()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(actor = %self.name.borrow(), tuple = %tuple))]
    fn accept(&self, tuple: &Tuple) -> bool {
        let mut ctx =
            ExecutionContext::new(&self.dispatcher, self.router.as_ref()).with_actor(self.name());

        for (slot, handler) in self.handlers.iter().enumerate() {
            if handler.accept(tuple, &mut ctx) {
                let errors = ctx.take_errors();
                if !errors.is_empty() {
                    tracing::debug!(count = errors.len(), "handler finished with errors");
                }
                if let Some(recorded) = self.runtime_errors.borrow_mut().get_mut(slot) {
                    *recorded = errors;
                }
                return true;
            }
        }
        false
    }
}
