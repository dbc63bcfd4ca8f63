//! Value encryption.
//!
//! A value is encoded with `MessagePack`, passed through a [`Cipher`], and
//! stored as a [`Value::Binary`]. Decryption reverses the steps. An unset
//! value stays unset in both directions so that empty stores need no key.

use crate::error::{Error, Result};
use crate::value::Value;

/// A symmetric byte cipher.
pub trait Cipher {
    /// Encrypts `plain`.
    fn encrypt(&self, plain: &[u8]) -> Vec<u8>;

    /// Decrypts `data`.
    fn decrypt(&self, data: &[u8]) -> Vec<u8>;
}

/// Repeating-key XOR.
///
/// Obfuscation only; it keeps saved values from being trivially edited.
#[derive(Clone, Debug)]
pub struct XorCipher {
    key: Vec<u8>,
}

impl XorCipher {
    /// Creates a cipher with the given key. An empty key leaves data as is.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        if self.key.is_empty() {
            return data.to_vec();
        }
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(byte, k)| byte ^ k)
            .collect()
    }
}

impl Cipher for XorCipher {
    fn encrypt(&self, plain: &[u8]) -> Vec<u8> {
        self.apply(plain)
    }

    fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        self.apply(data)
    }
}

impl Value {
    /// Encodes and encrypts this value into a binary value.
    ///
    /// # Errors
    /// Returns a serialization error if encoding fails.
    pub fn encrypt(&self, cipher: &dyn Cipher) -> Result<Value> {
        if self.is_unset() {
            return Ok(Value::Unset);
        }
        let bytes = rmp_serde::to_vec(self).map_err(|e| Error::serialization(e.to_string()))?;
        Ok(Value::binary(cipher.encrypt(&bytes)))
    }

    /// Decrypts and decodes a value produced by [`Value::encrypt`].
    ///
    /// # Errors
    /// Returns a type mismatch for non-binary input, or a serialization
    /// error if the decrypted bytes do not decode.
    pub fn decrypt(&self, cipher: &dyn Cipher) -> Result<Value> {
        match self {
            Value::Unset => Ok(Value::Unset),
            Value::Binary(data) => rmp_serde::from_slice(&cipher.decrypt(data))
                .map_err(|e| Error::serialization(e.to_string())),
            other => Err(Error::type_mismatch(
                crate::value::ValueKind::Binary,
                other.kind(),
            )),
        }
    }
}
