//! Integration tests for the parser and its diagnostics

use carlo_language::{
    CreateTarget, HighlightStyle, ParseErrorCode, Parser, SendPayload, Statement, lex_source,
    parse_source,
};

fn error_messages(source: &str) -> Vec<String> {
    parse_source(source)
        .errors
        .iter()
        .map(ToString::to_string)
        .collect()
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn several_actors_share_one_program() {
    let source = "\
actor
receives Load
end
end
actor hinge
receives Creak
end
receives Oil from can
end
end";
    let program = parse_source(source).program.expect("program");
    assert_eq!(program.actors.len(), 2);
    assert_eq!(program.actors[0].name, "");
    assert_eq!(program.actors[1].name, "hinge");
    assert_eq!(program.actors[1].handlers[1].source_actor, "can");
}

#[test]
fn sends_forms() {
    let source = "\
actor
receives Go
creates tuple reply Pong n 1
sends tuple reply
sends to other on m2 Ping n 2 m 3
end
end";
    let program = parse_source(source).program.expect("program");
    let statements = &program.actors[0].handlers[0].block.statements;

    assert!(matches!(
        &statements[0],
        Statement::Creates { target: CreateTarget::Tuple { name, tuple_type, .. }, .. }
            if name == "reply" && tuple_type == "Pong"
    ));
    assert!(matches!(
        &statements[1],
        Statement::Sends { payload: SendPayload::Named(name), .. } if name == "reply"
    ));
    let Statement::Sends {
        destination_actor,
        destination_id,
        payload,
        ..
    } = &statements[2]
    else {
        panic!("expected sends");
    };
    assert!(destination_actor.is_some());
    assert!(destination_id.is_some());
    let SendPayload::Literal { tuple_type, fields } = payload else {
        panic!("expected a literal tuple");
    };
    assert_eq!(tuple_type, "Ping");
    let keys: Vec<_> = fields.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["n", "m"]);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn error_messages_are_one_based() {
    assert_eq!(
        error_messages("lamp"),
        vec!["1,1: Error 1: Expected \"actor\", found _string_."]
    );
}

#[test]
fn missing_than_is_reported_at_the_operand() {
    let source = "actor\nreceives A where A.n more 3\nend\nend";
    assert_eq!(
        error_messages(source)[0],
        "2,27: Error 19: Expected \"than\", found _float_."
    );
}

#[test]
fn duplicate_arguments_omit_the_found_token() {
    let source = "actor\nreceives A\nmakes x sine with x 1 x 2\nend\nend";
    let messages = error_messages(source);
    assert_eq!(messages[0], "3,25: Error 20: Duplicate argument name");
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ParseErrorCode::ExpectedActor.number(), 1);
    assert_eq!(ParseErrorCode::ExpectedThan.number(), 19);
    assert_eq!(ParseErrorCode::ExpectedArgumentName.number(), 21);
}

// =============================================================================
// Highlight Mode
// =============================================================================

#[test]
fn highlight_mode_colours_without_building() {
    let source = "actor door\nreceives Knock\nnote who is there\nsends Open\nend\nend";
    let output = Parser::new(lex_source(source), false).parse();
    assert!(output.program.is_none());
    assert!(output.errors.is_empty());

    let styles: Vec<_> = output.highlights.iter().map(|highlight| highlight.style).collect();
    assert!(styles.contains(&HighlightStyle::Keyword));
    assert!(styles.contains(&HighlightStyle::Linda));
    assert!(styles.contains(&HighlightStyle::Note));
}

#[test]
fn highlight_mode_marks_errors() {
    let output = Parser::new(lex_source("actor\nreceives 5\nend\nend"), false).parse();
    assert_eq!(output.errors[0].code, ParseErrorCode::ExpectedTupleType);
    assert!(output
        .highlights
        .iter()
        .any(|highlight| highlight.style == HighlightStyle::Error));
}
