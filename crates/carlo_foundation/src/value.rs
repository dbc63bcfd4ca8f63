//! Core value type shared by scripts, tuples, and native actors.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::{ValueList, ValueMap};
use crate::error::{Error, Result};

/// The word scripts use to spell an unset value.
pub const NOTHING: &str = "nothing";

/// Dynamic value exchanged between scripts and the host.
///
/// Conversions are explicit: [`Value::as_number`] fails on words that do
/// not hold a number instead of silently yielding zero.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// No value has been assigned.
    #[default]
    Unset,
    /// A string.
    Word(String),
    /// A double-precision number.
    Number(f64),
    /// An ordered list.
    List(ValueList),
    /// An insertion-ordered string-keyed map.
    Map(ValueMap),
    /// Opaque bytes (for example the output of a cipher).
    Binary(Vec<u8>),
}

/// The tag of a [`Value`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Unset`]
    Unset,
    /// [`Value::Word`]
    Word,
    /// [`Value::Number`]
    Number,
    /// [`Value::List`]
    List,
    /// [`Value::Map`]
    Map,
    /// [`Value::Binary`]
    Binary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unset => "unset",
            Self::Word => "word",
            Self::Number => "number",
            Self::List => "list",
            Self::Map => "map",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Creates a binary value.
    #[must_use]
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary(bytes.into())
    }

    /// Creates an empty list value.
    #[must_use]
    pub fn empty_list() -> Self {
        Self::List(ValueList::new())
    }

    /// Creates an empty map value.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(ValueMap::new())
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Unset => ValueKind::Unset,
            Self::Word(_) => ValueKind::Word,
            Self::Number(_) => ValueKind::Number,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Binary(_) => ValueKind::Binary,
        }
    }

    /// Returns true if no value has been assigned.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns true if this is a word.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(self, Self::Word(_))
    }

    /// Reads this value as a number.
    ///
    /// Unset reads as zero. A word reads as a number only if its trimmed text
    /// parses as one.
    ///
    /// # Errors
    /// Returns an error for non-numeric words, lists, maps, and binary blobs.
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Self::Unset => Ok(0.0),
            Self::Number(n) => Ok(*n),
            Self::Word(w) => w.trim().parse().map_err(|_| Error::not_a_number(w.as_str())),
            other => Err(Error::type_mismatch(ValueKind::Number, other.kind())),
        }
    }

    /// Reads this value as an integer, truncating towards zero.
    ///
    /// # Errors
    /// Returns an error under the same conditions as [`Value::as_number`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> Result<i64> {
        self.as_number().map(|n| n as i64)
    }

    /// Returns the word if this is one.
    #[must_use]
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w),
            _ => None,
        }
    }

    /// Returns the list if this is one.
    #[must_use]
    pub const fn as_list(&self) -> Option<&ValueList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the mutable list if this is one.
    pub fn as_list_mut(&mut self) -> Option<&mut ValueList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the map if this is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the bytes if this is a binary value.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Looks up a key in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Returns the member `key`, creating it when missing.
    ///
    /// An unset value becomes an empty map first. Returns `None` when this
    /// value is neither unset nor a map.
    pub fn member_mut(&mut self, key: &str) -> Option<&mut Value> {
        if self.is_unset() {
            *self = Self::empty_map();
        }
        match self {
            Self::Map(m) => Some(m.entry_or_default(key)),
            _ => None,
        }
    }

    /// Sets `key` in a map value, converting an unset value to a map.
    ///
    /// # Errors
    /// Returns a type mismatch if this value is neither unset nor a map.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let kind = self.kind();
        let slot = self
            .member_mut(key)
            .ok_or_else(|| Error::type_mismatch(ValueKind::Map, kind))?;
        *slot = value.into();
        Ok(())
    }

    /// Appends to a list value, converting an unset value to a list.
    ///
    /// # Errors
    /// Returns a type mismatch if this value is neither unset nor a list.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        if self.is_unset() {
            *self = Self::empty_list();
        }
        let kind = self.kind();
        let list = self
            .as_list_mut()
            .ok_or_else(|| Error::type_mismatch(ValueKind::List, kind))?;
        list.push_back(value.into());
        Ok(())
    }
}

/// Formats a number the way scripts print it: integral values without a
/// decimal point.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unset, Self::Unset) => true,
            (Self::Word(a), Self::Word(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Word(a), Self::Binary(b)) | (Self::Binary(b), Self::Word(a)) => {
                a.as_bytes() == b.as_slice()
            }
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "{NOTHING}"),
            Self::Word(w) => write!(f, "{w:?}"),
            Self::Number(n) => write_number(f, *n),
            Self::List(l) => write!(f, "{l:?}"),
            Self::Map(m) => write!(f, "{m:?}"),
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Word(w) => f.write_str(w),
            Self::Number(n) => write_number(f, *n),
            Self::List(l) => {
                write!(f, "[")?;
                for (i, item) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

// Convenience From implementations

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    /// Scripts represent truth as 1 and falsehood as 0.
    fn from(b: bool) -> Self {
        Self::Number(if b { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Word(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Word(s)
    }
}

impl From<ValueList> for Value {
    fn from(l: ValueList) -> Self {
        Self::List(l)
    }
}

impl From<ValueMap> for Value {
    fn from(m: ValueMap) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
