//! Integration tests for editor highlighting

use carlo_engine::Coordinates;
use carlo_foundation::Tuple;
use carlo_language::{Colour, HighlightStyle, Span};
use carlo_runtime::{CarloHighlighter, EngineConfig, Host, MemoryAssets};

const FAULTY: &str = "\
actor
receives Press
note this goes wrong
makes ghost 1
end
end";

fn loaded_host() -> Host {
    let mut host = Host::new(EngineConfig::default()).unwrap();
    let assets = MemoryAssets::new().with("faulty", FAULTY);
    assert!(host.load(&assets, &Coordinates::default(), "faulty", ""));
    host.send(Tuple::of_type("Press"));
    host
}

#[test]
fn runtime_errors_paint_the_failing_token() {
    let mut host = loaded_host();
    let report = host.highlight("faulty", FAULTY, false);

    assert_eq!(
        report.runtime_errors,
        vec!["4,7: Runtime error R3: No such tuple or value."]
    );
    let marked: Vec<_> = report
        .highlights
        .iter()
        .filter(|highlight| highlight.runtime_error)
        .collect();
    assert_eq!(marked.len(), 1);
    assert_eq!(marked[0].span, Span::new(3, 6, 5));
    assert_eq!(marked[0].background(), Some(Colour::Red));
}

#[test]
fn modified_text_hides_runtime_errors() {
    let mut host = loaded_host();
    let report = host.highlight("faulty", FAULTY, true);
    assert!(report.runtime_errors.is_empty());
    assert!(report.highlights.iter().all(|highlight| highlight.background().is_none()));
}

#[test]
fn notes_are_brown() {
    let mut host = loaded_host();
    let report = host.highlight("faulty", FAULTY, true);
    let note = report
        .highlights
        .iter()
        .find(|highlight| highlight.style == HighlightStyle::Note)
        .expect("note");
    assert_eq!(note.span, Span::new(2, 0, 20));
    assert_eq!(note.foreground(), Colour::Brown);
}

#[test]
fn wrapped_screen_lines_form_one_logical_line() {
    let host = Host::new(EngineConfig::default()).unwrap();
    let mut highlighter = CarloHighlighter::new();
    highlighter.line("actor", 0);
    highlighter.line("receives", 1);
    highlighter.line("Press", 1);
    highlighter.line("end", 2);
    highlighter.line("end", 3);

    let report = highlighter.highlight(host.programs(), "nothing", true);
    assert!(report.parse_errors.is_empty(), "{:?}", report.parse_errors);
}

#[test]
fn parse_errors_reach_the_editor() {
    let mut host = Host::new(EngineConfig::default()).unwrap();
    let report = host.highlight("draft", "actor\nreceives Press\nsends\nend\nend", true);
    assert_eq!(
        report.parse_errors,
        vec!["3,7: Error 12: Expected \"tuple\" or tuple type, found _eol_."]
    );
    assert!(report.runtime_errors.is_empty());
}
