//! Persistent value storage.
//!
//! A [`ValueStore`] keeps values under string keys, either in memory or as
//! one `MessagePack` file per key in a directory. It hands out
//! [`ValueLoader`] handles, so native actors get persistable values without
//! writing their own loaders. [`StoreActor`] is such an actor: it gives
//! every script actor its own set of persistable values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use carlo_engine::Actor;
use carlo_foundation::{Error, ErrorKind, PersistableValue, Result, Tuple, Value, ValueLoader};

/// Extension of value files in a directory store.
pub const VALUE_EXTENSION: &str = "value";

/// Default name of the [`StoreActor`].
pub const STORE_ACTOR: &str = "this";

/// Caller name used for immediate-mode evaluation, which gets no storage.
pub const IMMEDIATE_CALLER: &str = "Immediate";

/// Serializes a value to bytes using `MessagePack` format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(value)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a value from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

enum Backend {
    Memory(RefCell<HashMap<String, Vec<u8>>>),
    Directory(PathBuf),
}

impl Backend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Memory(values) => Ok(values.borrow().get(key).cloned()),
            Self::Directory(root) => {
                let path = file_of(root, key);
                if !path.exists() {
                    return Ok(None);
                }
                fs::read(&path).map(Some).map_err(|e| {
                    Error::new(ErrorKind::IoError(format!(
                        "failed to read file '{}': {e}",
                        path.display()
                    )))
                })
            }
        }
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        match self {
            Self::Memory(values) => {
                values.borrow_mut().insert(key.to_string(), bytes);
                Ok(())
            }
            Self::Directory(root) => {
                let path = file_of(root, key);
                let file = File::create(&path).map_err(|e| {
                    Error::new(ErrorKind::IoError(format!(
                        "failed to create file '{}': {e}",
                        path.display()
                    )))
                })?;
                let mut writer = BufWriter::new(file);
                writer.write_all(&bytes).map_err(|e| {
                    Error::new(ErrorKind::IoError(format!(
                        "failed to write to file '{}': {e}",
                        path.display()
                    )))
                })?;
                writer.flush().map_err(|e| {
                    Error::new(ErrorKind::IoError(format!(
                        "failed to flush file '{}': {e}",
                        path.display()
                    )))
                })
            }
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        match self {
            Self::Memory(values) => Ok(values.borrow_mut().remove(key).is_some()),
            Self::Directory(root) => {
                let path = file_of(root, key);
                if !path.exists() {
                    return Ok(false);
                }
                fs::remove_file(&path).map(|()| true).map_err(|e| {
                    Error::new(ErrorKind::IoError(format!(
                        "failed to remove file '{}': {e}",
                        path.display()
                    )))
                })
            }
        }
    }
}

// Keys become file names. Bytes outside [A-Za-z0-9._-] are written as %XX,
// so distinct keys never share a file.
fn file_of(root: &Path, key: &str) -> PathBuf {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    root.join(format!("{stem}.{VALUE_EXTENSION}"))
}

/// Keyed value storage shared by every loader it hands out.
#[derive(Clone)]
pub struct ValueStore {
    backend: Rc<Backend>,
}

impl ValueStore {
    /// Creates a store that lives as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Rc::new(Backend::Memory(RefCell::new(HashMap::new()))),
        }
    }

    /// Creates a store writing one file per key under `root`.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub fn in_directory(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to create directory '{}': {e}",
                root.display()
            )))
        })?;
        Ok(Self {
            backend: Rc::new(Backend::Directory(root)),
        })
    }

    /// Reads the value under `key`. A missing key reads as unset.
    ///
    /// # Errors
    /// Returns an error if the stored bytes cannot be read or decoded.
    pub fn get(&self, key: &str) -> Result<Value> {
        match self.backend.read(key)? {
            Some(bytes) => from_bytes(&bytes),
            None => Ok(Value::Unset),
        }
    }

    /// Stores `value` under `key`.
    ///
    /// # Errors
    /// Returns an error if the value cannot be encoded or written.
    pub fn put(&self, key: &str, value: &Value) -> Result<()> {
        tracing::trace!(key, "storing value");
        self.backend.write(key, to_bytes(value)?)
    }

    /// Deletes `key`. Returns true if it was stored.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.backend.remove(key)
    }

    /// Returns a loader for `key`.
    #[must_use]
    pub fn loader(&self, key: impl Into<String>) -> Rc<dyn ValueLoader> {
        Rc::new(StoredValue {
            store: self.clone(),
            key: key.into(),
        })
    }
}

impl std::fmt::Debug for ValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.backend.as_ref() {
            Backend::Memory(_) => "memory",
            Backend::Directory(_) => "directory",
        };
        f.debug_struct("ValueStore").field("backend", &kind).finish()
    }
}

struct StoredValue {
    store: ValueStore,
    key: String,
}

impl ValueLoader for StoredValue {
    fn load(&self) -> Result<Value> {
        self.store.get(&self.key)
    }

    fn save(&self, value: &Value) -> Result<()> {
        self.store.put(&self.key, value)
    }
}

// =============================================================================
// Store actor
// =============================================================================

/// Native actor handing each script actor its own persistable values.
///
/// A script reads and assigns `this.gold`; the value lives under the key
/// `<caller>.gold`. Immediate-mode evaluation has no storage.
pub struct StoreActor {
    name: String,
    store: ValueStore,
}

impl StoreActor {
    /// Creates the actor under [`STORE_ACTOR`].
    #[must_use]
    pub fn new(store: ValueStore) -> Self {
        Self::named(STORE_ACTOR, store)
    }

    /// Creates the actor under another name.
    #[must_use]
    pub fn named(name: impl Into<String>, store: ValueStore) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// Returns the key a caller's value is stored under.
    #[must_use]
    pub fn key(caller: &str, name: &str) -> String {
        format!("{caller}.{name}")
    }
}

impl Actor for StoreActor {
    fn actor_name(&self) -> String {
        self.name.clone()
    }

    fn accept(&self, _tuple: &Tuple) -> bool {
        false
    }

    fn persistable_value(&self, name: &str, caller: &str) -> Option<PersistableValue> {
        if caller.is_empty() || caller == IMMEDIATE_CALLER {
            return None;
        }
        let loader = self.store.loader(Self::key(caller, name));
        match PersistableValue::load(loader) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%error, caller, name, "unable to load persistable value");
                None
            }
        }
    }
}
