//! Integration tests for promise round trips through a script

use std::cell::RefCell;
use std::rc::Rc;

use carlo_engine::{Actor, Coordinates, FunctionDispatcher, LocalRouter, ProgramManager, Promise, TupleRouter};
use carlo_foundation::{Tuple, Value};
use carlo_runtime::MemoryAssets;

const ORACLE: &str = "\
actor
receives Question where Question.n more than 0
sends to asker Answer ok 1 result Question.n * 10
end
receives Question
sends to asker Answer ok 0 result \"no\"
end
end";

/// Native actor that resolves its pending promise with each answer.
struct Asker {
    pending: RefCell<Option<Promise>>,
}

impl Actor for Asker {
    fn actor_name(&self) -> String {
        "asker".into()
    }

    fn accept(&self, tuple: &Tuple) -> bool {
        if tuple.tuple_type() != "Answer" {
            return false;
        }
        let Some(promise) = self.pending.borrow_mut().take() else {
            return false;
        };
        let ok = tuple.get("ok").cloned().unwrap_or_default();
        let result = tuple.get("result").cloned().unwrap_or_default();
        promise.set(&ok, result);
        true
    }
}

fn ask(n: i32) -> Option<(bool, Value)> {
    let router = Rc::new(LocalRouter::new("m1"));
    let asker = Rc::new(Asker {
        pending: RefCell::new(None),
    });
    let native: Rc<dyn Actor> = asker.clone();
    router.register_actor(&native);

    let shared: Rc<dyn TupleRouter> = router.clone();
    let mut manager = ProgramManager::new(shared, Rc::new(FunctionDispatcher::new()));
    let assets = MemoryAssets::new().with("oracle", ORACLE);
    assert!(manager.load(&assets, &Coordinates::default(), "oracle", ""));

    let promise = Promise::new();
    let future = promise.future();
    *asker.pending.borrow_mut() = Some(promise);
    assert!(!future.is_ready());

    router.route(Tuple::of_type("Question").with("n", n).to_actor("oracle"));
    future.poll()
}

#[test]
fn answered_questions_resolve_successfully() {
    assert_eq!(ask(4), Some((true, Value::from(40))));
}

#[test]
fn refusals_resolve_unsuccessfully() {
    assert_eq!(ask(0), Some((false, Value::from("no"))));
}
