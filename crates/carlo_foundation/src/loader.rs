//! Persistable values.
//!
//! A native actor can expose a value that scripts read and assign as if it
//! were local. The actor hands out a [`PersistableValue`]: a copy of the
//! value plus the [`ValueLoader`] that knows where it lives. Writing through
//! the handle does nothing until [`PersistableValue::save`] is called.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

/// Load/save hook for one externally stored value.
pub trait ValueLoader {
    /// Reads the current stored value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Value>;

    /// Replaces the stored value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn save(&self, value: &Value) -> Result<()>;
}

/// A value together with the loader that persists it.
#[derive(Clone)]
pub struct PersistableValue {
    value: Value,
    loader: Rc<dyn ValueLoader>,
}

impl PersistableValue {
    /// Wraps an already loaded value.
    #[must_use]
    pub fn new(value: Value, loader: Rc<dyn ValueLoader>) -> Self {
        Self { value, loader }
    }

    /// Loads the value through `loader`.
    ///
    /// # Errors
    /// Returns an error if the loader fails.
    pub fn load(loader: Rc<dyn ValueLoader>) -> Result<Self> {
        let value = loader.load()?;
        Ok(Self { value, loader })
    }

    /// Returns the working copy.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the working copy for modification.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Consumes the handle, returning the working copy.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Writes the working copy back through the loader.
    ///
    /// # Errors
    /// Returns an error if the loader fails.
    pub fn save(&self) -> Result<()> {
        self.loader.save(&self.value)
    }
}

impl fmt::Debug for PersistableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistableValue")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// A loader backed by a shared in-memory cell.
///
/// Counts saves, which makes it the loader of choice for native actors in
/// tests and for values that only need to outlive one evaluation.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    stored: RefCell<Value>,
    saves: RefCell<usize>,
}

impl MemoryLoader {
    /// Creates a loader holding `value`.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            stored: RefCell::new(value),
            saves: RefCell::new(0),
        }
    }

    /// Returns the stored value.
    #[must_use]
    pub fn stored(&self) -> Value {
        self.stored.borrow().clone()
    }

    /// Returns how many times [`ValueLoader::save`] has been called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ValueLoader for MemoryLoader {
    fn load(&self) -> Result<Value> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, value: &Value) -> Result<()> {
        *self.stored.borrow_mut() = value.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
