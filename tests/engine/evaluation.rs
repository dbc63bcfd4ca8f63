//! Integration tests for evaluation semantics
//!
//! Each test runs a handler body once, outside any tuple delivery.

use std::rc::Rc;

use carlo_engine::{
    Actor, Arguments, ExecutionContext, FunctionDispatcher, LocalRouter, ScriptActor, TupleRouter,
};
use carlo_foundation::{MemoryLoader, PersistableValue, Tuple, Value};
use carlo_language::{RuntimeErrorCode, parse_source};

/// A native actor with one persistable value and one function.
struct Vault {
    gold: Rc<MemoryLoader>,
}

impl Actor for Vault {
    fn actor_name(&self) -> String {
        "vault".into()
    }

    fn accept(&self, _tuple: &Tuple) -> bool {
        false
    }

    fn perform(&self, function: &str, args: &Arguments, caller: &str) -> Option<Value> {
        match function {
            "owner" => Some(Value::from(caller)),
            "double" => args
                .get("n")
                .and_then(|n| n.as_number().ok())
                .map(|n| Value::from(n * 2.0)),
            _ => None,
        }
    }

    fn persistable_value(&self, name: &str, _caller: &str) -> Option<PersistableValue> {
        if name != "gold" {
            return None;
        }
        PersistableValue::load(self.gold.clone()).ok()
    }
}

struct Bench {
    dispatcher: Rc<FunctionDispatcher>,
    router: Rc<LocalRouter>,
    vault: Rc<dyn Actor>,
    gold: Rc<MemoryLoader>,
}

fn bench() -> Bench {
    let gold = Rc::new(MemoryLoader::new(Value::from(5)));
    let vault: Rc<dyn Actor> = Rc::new(Vault { gold: gold.clone() });
    let dispatcher = Rc::new(FunctionDispatcher::new());
    dispatcher.register(&vault);
    Bench {
        dispatcher,
        router: Rc::new(LocalRouter::new("m1")),
        vault,
        gold,
    }
}

/// Runs `body` as actor "listener", with `values` already in context.
fn run(
    bench: &Bench,
    values: &[(&str, Value)],
    body: &str,
) -> (Option<Value>, Vec<RuntimeErrorCode>) {
    let source = format!("actor listener\nreceives Run\n{body}\nend\nend");
    let output = parse_source(&source);
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    let program = output.program.expect("program");

    let router: Rc<dyn TupleRouter> = bench.router.clone();
    let actor = ScriptActor::from_def(&program.actors[0], bench.dispatcher.clone(), router);
    let mut ctx = ExecutionContext::new(&bench.dispatcher, bench.router.as_ref());
    for (name, value) in values {
        ctx.set_value(*name, value.clone());
    }
    let value = actor.eval_one(&mut ctx);
    let codes = ctx.take_errors().iter().map(|error| error.code).collect();
    (value, codes)
}

fn value_of(bench: &Bench, body: &str) -> Option<Value> {
    run(bench, &[], body).0
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn multiplication_binds_tighter() {
    let bench = bench();
    assert_eq!(value_of(&bench, "creates value x 1 + 2 * 3"), Some(Value::from(7)));
    assert_eq!(value_of(&bench, "creates value x ( 1 + 2 ) * 3"), Some(Value::from(9)));
    assert_eq!(value_of(&bench, "creates value x 10 - 4 - 3"), Some(Value::from(3)));
}

#[test]
fn modulo_rounds_its_operands() {
    let bench = bench();
    assert_eq!(value_of(&bench, "creates value x 7 % 3"), Some(Value::from(1)));
    assert_eq!(value_of(&bench, "creates value x 6.6 % 3.4"), Some(Value::from(1)));
}

#[test]
fn adding_a_word_joins_text() {
    let bench = bench();
    assert_eq!(
        value_of(&bench, "creates value x \"door\" + \"bell\""),
        Some(Value::from("doorbell"))
    );
}

#[test]
fn logic_and_comparison() {
    let bench = bench();
    assert_eq!(
        value_of(&bench, "creates value x 3 more than 2 and 1 is 1"),
        Some(Value::from(1))
    );
    assert_eq!(
        value_of(&bench, "creates value x 3 less than 2 or 1 is not 1"),
        Some(Value::from(0))
    );
}

#[test]
fn ordering_a_word_is_an_error() {
    let bench = bench();
    let (value, errors) = run(&bench, &[], "creates value x \"tall\" more than 2");
    assert_eq!(value, None);
    assert_eq!(errors, vec![RuntimeErrorCode::ValueIsNotANumber]);
}

#[test]
fn native_and_inbuilt_calls() {
    let bench = bench();
    assert_eq!(value_of(&bench, "creates value x vault.double with n 21"), Some(Value::from(42)));
    assert_eq!(value_of(&bench, "creates value x vault.owner"), Some(Value::from("listener")));
    assert_eq!(value_of(&bench, "creates value x cosine with x 0"), Some(Value::from(1)));

    let (value, errors) = run(&bench, &[], "creates value x vault.melt with n 1");
    assert_eq!(value, None);
    assert_eq!(errors, vec![RuntimeErrorCode::NoSuchFunction]);
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn each_sums_a_list() {
    let bench = bench();
    let items = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
    let body = "\
creates value total 0
each item in items
makes total total + item
end
creates value result total";
    let (value, errors) = run(&bench, &[("items", items)], body);
    assert_eq!(value, Some(Value::from(6)));
    assert!(errors.is_empty());
}

#[test]
fn each_over_nothing_does_nothing() {
    let bench = bench();
    let body = "\
creates value total 0
each item in items
makes total total + 1
end
creates value result total";
    let (value, errors) = run(&bench, &[("items", Value::Unset)], body);
    assert_eq!(value, Some(Value::from(0)));
    assert!(errors.is_empty());

    let (value, errors) = run(&bench, &[("items", Value::from(4))], body);
    assert_eq!(value, None);
    assert_eq!(errors, vec![RuntimeErrorCode::ValueIsNotAList]);
}

#[test]
fn stop_leaves_the_loop() {
    let bench = bench();
    let body = "\
creates value n 0
while n less than 10
makes n n + 1
if n is 4
stop
end
end
creates value result n";
    assert_eq!(value_of(&bench, body), Some(Value::from(4)));
}

#[test]
fn if_else_picks_one_branch() {
    let bench = bench();
    let body = "\
creates value size 12
if size more than 10
creates value label \"big\"
else
creates value label \"small\"
end";
    assert_eq!(value_of(&bench, body), Some(Value::from("big")));
}

#[test]
fn duplicate_values_are_rejected() {
    let bench = bench();
    let (value, errors) = run(&bench, &[], "creates value x 1\ncreates value x 2");
    assert_eq!(value, None);
    assert_eq!(errors, vec![RuntimeErrorCode::ValueAlreadyExists]);
}

#[test]
fn assigning_nowhere_is_an_error() {
    let bench = bench();
    let (_, errors) = run(&bench, &[], "makes ghost 1");
    assert_eq!(errors, vec![RuntimeErrorCode::NoSuchTupleOrValue]);
}

#[test]
fn tuples_are_built_then_edited() {
    let bench = bench();
    let body = "\
creates tuple memo Memo text \"hi\"
makes memo.text \"bye\"
creates value result memo.text";
    assert_eq!(value_of(&bench, body), Some(Value::from("bye")));
}

// =============================================================================
// Persistable values
// =============================================================================

#[test]
fn persistable_values_save_once_per_assignment() {
    let bench = bench();
    assert_eq!(value_of(&bench, "makes vault.gold vault.gold + 1"), Some(Value::from(6)));
    assert_eq!(bench.gold.stored(), Value::from(6));
    assert_eq!(bench.gold.save_count(), 1);
}

#[test]
fn reading_a_persistable_value_does_not_save() {
    let bench = bench();
    assert_eq!(value_of(&bench, "creates value x vault.gold"), Some(Value::from(5)));
    assert_eq!(bench.gold.save_count(), 0);
}

#[test]
fn dropped_owners_have_no_values() {
    let mut bench = bench();
    assert_eq!(Rc::strong_count(&bench.vault), 1);
    bench.vault = Rc::new(Vault {
        gold: bench.gold.clone(),
    });

    let (value, errors) = run(&bench, &[], "makes vault.gold 1");
    assert_eq!(value, None);
    assert_eq!(errors, vec![RuntimeErrorCode::NoSuchTupleOrValue]);
    assert_eq!(bench.gold.save_count(), 0);
}
