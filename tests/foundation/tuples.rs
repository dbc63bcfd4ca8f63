//! Integration tests for Tuple
//!
//! Tests the routing envelope and payload fields.

use carlo_foundation::{Tuple, Value};

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn envelope_defaults_to_empty() {
    let tuple = Tuple::new();
    assert_eq!(tuple.tuple_type(), "");
    assert_eq!(tuple.source_actor(), "");
    assert_eq!(tuple.source_id(), "");
    assert_eq!(tuple.destination_actor(), "");
    assert_eq!(tuple.destination_id(), "");
}

#[test]
fn builder_sets_envelope_and_payload() {
    let tuple = Tuple::of_type("Open")
        .from_actor("key")
        .to_actor("door")
        .with("force", 3);

    assert_eq!(tuple.tuple_type(), "Open");
    assert_eq!(tuple.source_actor(), "key");
    assert_eq!(tuple.destination_actor(), "door");
    assert_eq!(tuple.get("force"), Some(&Value::from(3)));
}

#[test]
fn envelope_keys_are_fields() {
    let mut tuple = Tuple::of_type("Ping");
    tuple.set_destination_id("m2");
    assert_eq!(tuple.get("type"), Some(&Value::from("Ping")));
    assert_eq!(tuple.get("destinationID"), Some(&Value::from("m2")));
}

// =============================================================================
// Payload
// =============================================================================

#[test]
fn field_mut_creates_unset_fields() {
    let mut tuple = Tuple::of_type("Bag");
    tuple.field_mut("items").push("apple").unwrap();
    tuple.field_mut("items").push("pear").unwrap();
    assert_eq!(
        tuple.get("items"),
        Some(&Value::from(vec!["apple", "pear"]))
    );
}

#[test]
fn display_shows_type_addresses_and_payload() {
    let tuple = Tuple::of_type("Say").from_actor("bard").with("text", "hello");
    assert_eq!(tuple.to_string(), "Say from bard {text hello}");
}
