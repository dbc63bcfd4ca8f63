//! Promise and future for tuple round trips.
//!
//! A native actor that routes a request and expects a reply keeps the
//! [`Future`] and hands the [`Promise`] to whatever handles the reply. The
//! host loop keeps routing; the actor polls the future until it resolves.

use std::cell::RefCell;
use std::rc::Rc;

use carlo_foundation::Value;

#[derive(Debug, Default)]
struct State {
    set: bool,
    success: bool,
    value: Value,
}

/// The writing half.
#[derive(Clone, Debug, Default)]
pub struct Promise {
    state: Rc<RefCell<State>>,
}

/// The reading half.
#[derive(Clone, Debug)]
pub struct Future {
    state: Rc<RefCell<State>>,
}

impl Promise {
    /// Creates an unresolved promise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a future linked to this promise.
    #[must_use]
    pub fn future(&self) -> Future {
        Future {
            state: Rc::clone(&self.state),
        }
    }

    /// Resolves with `value`. Success means `success_value` is 1. Returns
    /// the success flag.
    pub fn set(&self, success_value: &Value, value: Value) -> bool {
        let success = success_value.as_integer().is_ok_and(|n| n == 1);
        let mut state = self.state.borrow_mut();
        state.set = true;
        state.success = success;
        state.value = value;
        success
    }

    /// Resolves successfully with no value.
    pub fn succeed(&self) {
        let mut state = self.state.borrow_mut();
        state.set = true;
        state.success = true;
    }
}

impl Future {
    /// Returns the outcome once the promise is resolved: the success flag
    /// and the value it was resolved with.
    #[must_use]
    pub fn poll(&self) -> Option<(bool, Value)> {
        let state = self.state.borrow();
        state.set.then(|| (state.success, state.value.clone()))
    }

    /// Returns true once the promise is resolved.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.borrow().set
    }
}
