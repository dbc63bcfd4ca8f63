//! Integration tests for the embedding host

use std::cell::RefCell;
use std::rc::Rc;

use carlo_engine::{Actor, Coordinates};
use carlo_foundation::{Tuple, Value};
use carlo_runtime::{DirectoryAssets, EngineConfig, Host, ImmediateError, MemoryAssets, ValueStore};

const COUNTER: &str = "\
actor
receives Press
makes this.presses this.presses + 1
sends to panel Count n this.presses
end
end";

/// A native actor standing in for a device on the host side.
struct Panel {
    seen: RefCell<Vec<Tuple>>,
}

impl Panel {
    fn attach(host: &Host) -> Rc<Self> {
        let panel = Rc::new(Self {
            seen: RefCell::new(Vec::new()),
        });
        let native: Rc<dyn Actor> = panel.clone();
        host.register_native(&native);
        panel
    }

    fn counts(&self) -> Vec<Value> {
        self.seen
            .borrow()
            .iter()
            .filter(|tuple| tuple.tuple_type() == "Count")
            .filter_map(|tuple| tuple.get("n").cloned())
            .collect()
    }
}

impl Actor for Panel {
    fn actor_name(&self) -> String {
        "panel".into()
    }

    fn accept(&self, tuple: &Tuple) -> bool {
        self.seen.borrow_mut().push(tuple.clone());
        true
    }
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn counts_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssets::new(dir.path().join("programs"));
    assets.store("counter", COUNTER).unwrap();

    {
        let store = ValueStore::in_directory(dir.path().join("values")).unwrap();
        let mut host = Host::with_store(EngineConfig::default(), store).unwrap();
        let panel = Panel::attach(&host);
        assert!(host.load(&assets, &Coordinates::default(), "counter", ""));
        host.send(Tuple::of_type("Press"));
        host.send(Tuple::of_type("Press"));
        assert_eq!(panel.counts(), vec![Value::from(1), Value::from(2)]);
    }

    let store = ValueStore::in_directory(dir.path().join("values")).unwrap();
    let mut host = Host::with_store(EngineConfig::default(), store).unwrap();
    let panel = Panel::attach(&host);
    assert!(host.load(&assets, &Coordinates::default(), "counter", ""));
    host.send(Tuple::of_type("Press"));
    assert_eq!(panel.counts(), vec![Value::from(3)]);
}

#[test]
fn small_read_chunks_load_the_same_program() {
    let config = EngineConfig::default().with_read_chunk_size(4);
    let mut host = Host::new(config).unwrap();
    let panel = Panel::attach(&host);
    let assets = MemoryAssets::new().with("counter", COUNTER);

    assert!(host.load(&assets, &Coordinates::default(), "counter", ""));
    host.send(Tuple::of_type("Press"));
    assert_eq!(panel.counts(), vec![Value::from(1)]);
    assert!(host.runtime_errors("counter").is_empty());
}

#[test]
fn instances_count_separately() {
    let mut host = Host::new(EngineConfig::default()).unwrap();
    let panel = Panel::attach(&host);
    let assets = MemoryAssets::new().with("counter", COUNTER);

    host.load(&assets, &Coordinates::default(), "left", "counter");
    host.load(&assets, &Coordinates::default(), "right", "counter");
    host.send(Tuple::of_type("Press").to_actor("left"));
    host.send(Tuple::of_type("Press").to_actor("left"));
    host.send(Tuple::of_type("Press").to_actor("right"));

    assert_eq!(host.store().get("left.presses").unwrap(), Value::from(2));
    assert_eq!(host.store().get("right.presses").unwrap(), Value::from(1));
    assert_eq!(panel.counts().len(), 3);

    assert!(host.unload("left"));
    assert_eq!(host.programs().program_names(), vec!["right"]);
}

#[test]
fn programs_never_shadow_native_actors() {
    let mut host = Host::new(EngineConfig::default()).unwrap();
    let panel = Panel::attach(&host);
    let assets = MemoryAssets::new()
        .with("counter", COUNTER)
        .with("impostor", "actor\nreceives Ping\nend\nend");

    assert!(host.load(&assets, &Coordinates::default(), "counter", ""));
    host.send(Tuple::of_type("Press"));
    assert!(host.load(&assets, &Coordinates::default(), "this", "impostor"));
    assert!(host.load(&assets, &Coordinates::default(), "panel", "impostor"));
    host.send(Tuple::of_type("Press"));

    assert_eq!(panel.counts(), vec![Value::from(1), Value::from(2)]);
    assert!(host.runtime_errors("counter").is_empty());
    assert!(host.dispatcher().is_registered("this"));

    assert!(host.unload("this"));
    host.send(Tuple::of_type("Press"));
    assert_eq!(host.store().get("counter.presses").unwrap(), Value::from(3));
}

// =============================================================================
// Immediate mode
// =============================================================================

#[test]
fn immediate_lines_reach_native_actors() {
    let host = Host::new(EngineConfig::default().with_machine_id("desk")).unwrap();
    let panel = Panel::attach(&host);

    assert_eq!(host.immediate("sends to panel Count n 9"), Ok(Value::from(1)));
    let sent = panel.seen.borrow()[0].clone();
    assert_eq!(sent.source_actor(), "Immediate");
    assert_eq!(sent.source_id(), "desk");
    assert_eq!(sent.get("n"), Some(&Value::from(9)));
}

#[test]
fn immediate_expressions() {
    let host = Host::new(EngineConfig::default()).unwrap();
    assert_eq!(host.immediate("\"lamp\" + 2"), Ok(Value::from("lamp2")));
    assert_eq!(host.immediate("2 more than 1"), Ok(Value::from(1)));
    assert_eq!(host.immediate("3"), Ok(Value::from(3)));
}

#[test]
fn immediate_lines_have_no_storage() {
    let host = Host::new(EngineConfig::default()).unwrap();
    assert!(matches!(
        host.immediate("makes this.gold 5"),
        Err(ImmediateError::Runtime(_))
    ));
    assert_eq!(host.store().get("Immediate.gold").unwrap(), Value::Unset);
}
