//! Tuples: typed, addressed key-value messages.
//!
//! A tuple is a [`ValueMap`] with five reserved keys that carry its type and
//! routing envelope. Everything else is payload.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::ValueMap;
use crate::value::Value;

/// Reserved tuple keys.
pub mod keys {
    /// The tuple type handlers match on.
    pub const TYPE: &str = "type";
    /// Name of the sending actor.
    pub const SOURCE_ACTOR: &str = "sourceActor";
    /// Machine ID of the sending router.
    pub const SOURCE_ID: &str = "sourceID";
    /// Name of the receiving actor (empty means broadcast).
    pub const DESTINATION_ACTOR: &str = "destinationActor";
    /// Machine ID of the receiving router.
    pub const DESTINATION_ID: &str = "destinationID";
}

/// A typed, addressed key-value message.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Tuple {
    fields: ValueMap,
}

impl Tuple {
    /// Creates an empty tuple.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tuple of the given type.
    #[must_use]
    pub fn of_type(tuple_type: impl Into<String>) -> Self {
        let mut tuple = Self::new();
        tuple.set_tuple_type(tuple_type);
        tuple
    }

    /// Builder method to add a payload field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    /// Builder method to set the source actor.
    #[must_use]
    pub fn from_actor(mut self, actor: impl Into<String>) -> Self {
        self.set_source_actor(actor);
        self
    }

    /// Builder method to set the destination actor.
    #[must_use]
    pub fn to_actor(mut self, actor: impl Into<String>) -> Self {
        self.set_destination_actor(actor);
        self
    }

    fn word(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_word).unwrap_or("")
    }

    /// Returns the tuple type, or `""` if unset.
    #[must_use]
    pub fn tuple_type(&self) -> &str {
        self.word(keys::TYPE)
    }

    /// Returns the source actor, or `""` if unset.
    #[must_use]
    pub fn source_actor(&self) -> &str {
        self.word(keys::SOURCE_ACTOR)
    }

    /// Returns the source machine ID, or `""` if unset.
    #[must_use]
    pub fn source_id(&self) -> &str {
        self.word(keys::SOURCE_ID)
    }

    /// Returns the destination actor, or `""` if unset.
    #[must_use]
    pub fn destination_actor(&self) -> &str {
        self.word(keys::DESTINATION_ACTOR)
    }

    /// Returns the destination machine ID, or `""` if unset.
    #[must_use]
    pub fn destination_id(&self) -> &str {
        self.word(keys::DESTINATION_ID)
    }

    /// Sets the tuple type.
    pub fn set_tuple_type(&mut self, tuple_type: impl Into<String>) {
        self.fields.insert(keys::TYPE, Value::Word(tuple_type.into()));
    }

    /// Sets the source actor.
    pub fn set_source_actor(&mut self, actor: impl Into<String>) {
        self.fields.insert(keys::SOURCE_ACTOR, Value::Word(actor.into()));
    }

    /// Sets the source machine ID.
    pub fn set_source_id(&mut self, id: impl Into<String>) {
        self.fields.insert(keys::SOURCE_ID, Value::Word(id.into()));
    }

    /// Sets the destination actor.
    pub fn set_destination_actor(&mut self, actor: impl Into<String>) {
        self.fields
            .insert(keys::DESTINATION_ACTOR, Value::Word(actor.into()));
    }

    /// Sets the destination machine ID.
    pub fn set_destination_id(&mut self, id: impl Into<String>) {
        self.fields.insert(keys::DESTINATION_ID, Value::Word(id.into()));
    }

    /// Gets a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key, value.into());
    }

    /// Returns a field, creating it unset when missing.
    pub fn field_mut(&mut self, key: &str) -> &mut Value {
        self.fields.entry_or_default(key)
    }

    /// Returns all fields, reserved keys included.
    #[must_use]
    pub const fn fields(&self) -> &ValueMap {
        &self.fields
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tuple_type())?;
        if !self.source_actor().is_empty() {
            write!(f, " from {}", self.source_actor())?;
        }
        if !self.destination_actor().is_empty() {
            write!(f, " to {}", self.destination_actor())?;
        }
        let payload: Vec<_> = self
            .fields
            .iter()
            .filter(|(k, _)| !is_reserved(k))
            .collect();
        if !payload.is_empty() {
            write!(f, " {{")?;
            for (i, (k, v)) in payload.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k} {v}")?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

/// Returns true for the five envelope keys.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    matches!(
        key,
        keys::TYPE
            | keys::SOURCE_ACTOR
            | keys::SOURCE_ID
            | keys::DESTINATION_ACTOR
            | keys::DESTINATION_ID
    )
}
