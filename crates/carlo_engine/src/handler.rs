//! Running tuple handlers.

use carlo_foundation::Tuple;
use carlo_language::TupleHandler;

use crate::context::ExecutionContext;
use crate::eval::{Evaluate, is_true};

/// Delivery of a tuple to a parsed handler.
pub trait HandleTuple {
    /// Offers `tuple` to this handler.
    ///
    /// On a type and source match the tuple is bound in `ctx` under the
    /// handler's alias (or its type), the `where` condition is checked, and
    /// the block runs. Returns true if the block ran, whatever its outcome;
    /// failures are left in `ctx`.
    fn accept(&self, tuple: &Tuple, ctx: &mut ExecutionContext<'_>) -> bool;
}

impl HandleTuple for TupleHandler {
    fn accept(&self, tuple: &Tuple, ctx: &mut ExecutionContext<'_>) -> bool {
        if !self.matches(tuple) {
            return false;
        }
        ctx.insert_tuple(self.binding(), tuple.clone());

        if let Some(condition) = &self.condition {
            match condition.eval(ctx) {
                Some(value) if is_true(&value) => {}
                _ => return false,
            }
        }

        let _ = self.block.eval(ctx);
        true
    }
}
