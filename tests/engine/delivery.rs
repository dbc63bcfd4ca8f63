//! Integration tests for program loading and tuple delivery

use std::rc::Rc;

use carlo_engine::{Actor, Coordinates, FunctionDispatcher, LocalRouter, ProgramManager, TupleRouter};
use carlo_foundation::{Tuple, Value};
use carlo_runtime::MemoryAssets;

use crate::Recorder;

const CHIME: &str = "\
actor
receives Load
sends Tick n 3
end
end
actor bell
receives Tick from clock where Tick.n more than 0
sends to recorder Rang count Tick.n * 2
end
end";

const ECHO: &str = "\
actor
receives Ping
sends to recorder Pong
end
receives Unload
sends to recorder Gone
end
end";

struct World {
    router: Rc<LocalRouter>,
    recorder: Rc<Recorder>,
    manager: ProgramManager,
}

fn world() -> World {
    let router = Rc::new(LocalRouter::new("m1"));
    let recorder = Recorder::new("recorder");
    let native: Rc<dyn Actor> = recorder.clone();
    router.register_actor(&native);

    let shared: Rc<dyn TupleRouter> = router.clone();
    let manager = ProgramManager::new(shared, Rc::new(FunctionDispatcher::new()));
    World {
        router,
        recorder,
        manager,
    }
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn load_starts_a_chain_of_tuples() {
    let assets = MemoryAssets::new().with("clock", CHIME);
    let mut world = world();

    assert!(world.manager.load(&assets, &Coordinates::default(), "clock", ""));
    assert_eq!(world.recorder.types(), vec!["Tick", "Rang"]);

    let tick = world.recorder.last("Tick").expect("tick");
    assert_eq!(tick.source_actor(), "clock");
    assert_eq!(tick.source_id(), "m1");

    let rang = world.recorder.last("Rang").expect("rang");
    assert_eq!(rang.source_actor(), "bell");
    assert_eq!(rang.get("count"), Some(&Value::from(6)));
}

#[test]
fn handlers_ignore_other_sources() {
    let assets = MemoryAssets::new().with("clock", CHIME);
    let mut world = world();
    world.manager.load(&assets, &Coordinates::default(), "clock", "");
    world.recorder.clear();

    world
        .router
        .route(Tuple::of_type("Tick").from_actor("sundial").with("n", 1));
    assert_eq!(world.recorder.types(), vec!["Tick"]);
}

#[test]
fn lifecycle_tuples_bypass_the_router() {
    let assets = MemoryAssets::new().with("echo", ECHO);
    let mut world = world();
    world.manager.load(&assets, &Coordinates::default(), "echo", "");

    // Load is delivered directly, so the router never sees it.
    assert!(world.recorder.types().is_empty());

    assert!(world.manager.unload("echo"));
    let gone = world.recorder.last("Gone").expect("gone");
    assert_eq!(gone.source_actor(), "echo");
}

// =============================================================================
// Templates
// =============================================================================

#[test]
fn template_instances_answer_under_their_own_names() {
    let assets = MemoryAssets::new().with("echo", ECHO);
    let mut world = world();
    let here = Coordinates::new(4, 5, 6);

    assert!(world.manager.load(&assets, &here, "echo-1", "echo"));
    assert!(world.manager.load(&assets, &here, "echo-2", "echo"));
    assert_eq!(world.manager.is_from_template("echo-2"), Some("echo"));

    world.router.route(Tuple::of_type("Ping").to_actor("echo-2"));
    let pong = world.recorder.last("Pong").expect("pong");
    assert_eq!(pong.source_actor(), "echo-2");
    assert_eq!(world.recorder.types(), vec!["Pong"]);

    world.recorder.clear();
    world.router.route(Tuple::of_type("Ping"));
    assert_eq!(world.recorder.types(), vec!["Ping", "Pong", "Pong"]);
}

#[test]
fn unloaded_programs_stop_answering() {
    let assets = MemoryAssets::new().with("echo", ECHO);
    let mut world = world();
    world.manager.load(&assets, &Coordinates::default(), "echo", "");
    world.manager.unload("echo");
    world.recorder.clear();

    world.router.route(Tuple::of_type("Ping"));
    assert_eq!(world.recorder.types(), vec!["Ping"]);
    assert!(world.manager.program_names().is_empty());
}
