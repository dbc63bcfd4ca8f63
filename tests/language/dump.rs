//! Integration tests for the syntax tree dump

use carlo_language::{dump_expression, dump_program, parse_source};
use pretty_assertions::assert_eq;

fn dump(source: &str) -> String {
    dump_program(&parse_source(source).program.expect("program"))
}

#[test]
fn dump_covers_every_actor() {
    let source = "\
actor clock
receives Load
sends Tick
end
end
actor bell
receives Tick from clock
stop
end
end";
    let expected = "\
Program
    Actor \"clock\"
        Handler Load
            Block
                Sends Tick
    Actor \"bell\"
        Handler Tick from clock
            Block
                Stop
";
    assert_eq!(dump(source), expected);
}

#[test]
fn dump_expression_shows_precedence() {
    let program = parse_source("actor\nreceives A\nmakes x 1 + 2 * 3\nend\nend")
        .program
        .expect("program");
    let carlo_language::Statement::Makes { value, .. } =
        &program.actors[0].handlers[0].block.statements[0]
    else {
        panic!("expected makes");
    };
    let expected = "\
Operator +
    Number 1
    Operator *
        Number 2
        Number 3
";
    assert_eq!(dump_expression(value), expected);
}

#[test]
fn dump_is_stable_across_parses() {
    let source = "actor\nreceives A\nsends B b 2 a 1\nend\nend";
    assert_eq!(dump(source), dump(source));
}
