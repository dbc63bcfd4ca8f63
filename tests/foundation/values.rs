//! Integration tests for Value
//!
//! Tests numeric conversion, structural equality, and display.

use carlo_foundation::{ErrorKind, NOTHING, Value, ValueKind};

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn unset_reads_as_zero() {
    assert_eq!(Value::Unset.as_number().unwrap(), 0.0);
    assert_eq!(Value::Unset.as_integer().unwrap(), 0);
}

#[test]
fn numeric_words_read_as_numbers() {
    assert_eq!(Value::from("12").as_number().unwrap(), 12.0);
    assert_eq!(Value::from("-0.25").as_number().unwrap(), -0.25);
}

#[test]
fn other_words_are_not_numbers() {
    let error = Value::from("twelve").as_number().unwrap_err();
    assert!(matches!(error.kind, ErrorKind::NotANumber(ref word) if word == "twelve"));
}

#[test]
fn containers_are_type_mismatches() {
    let error = Value::empty_map().as_number().unwrap_err();
    assert!(matches!(
        error.kind,
        ErrorKind::TypeMismatch {
            expected: ValueKind::Number,
            actual: ValueKind::Map
        }
    ));
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn numbers_and_words_differ() {
    assert_ne!(Value::from(3), Value::from("3"));
}

#[test]
fn lists_compare_as_bags() {
    assert_eq!(
        Value::from(vec!["a", "b", "c"]),
        Value::from(vec!["c", "a", "b"])
    );
    assert_ne!(Value::from(vec!["a", "b"]), Value::from(vec!["a", "b", "b"]));
}

#[test]
fn maps_ignore_insertion_order() {
    let mut a = Value::Unset;
    a.set("hp", 3).unwrap();
    a.set("name", "orc").unwrap();
    let mut b = Value::Unset;
    b.set("name", "orc").unwrap();
    b.set("hp", 3).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn integral_numbers_print_without_fraction() {
    assert_eq!(Value::from(7.0).to_string(), "7");
    assert_eq!(Value::from(0.5).to_string(), "0.5");
}

#[test]
fn nested_values_print_readably() {
    let mut door = Value::Unset;
    door.set("state", "open").unwrap();
    door.set("keys", vec![1, 2]).unwrap();
    assert_eq!(door.to_string(), "{state open, keys [1 2]}");
    assert_eq!(format!("{:?}", Value::Unset), NOTHING);
}
