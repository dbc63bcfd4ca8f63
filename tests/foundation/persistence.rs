//! Integration tests for persistable values and encryption

use std::rc::Rc;

use carlo_foundation::{Cipher, MemoryLoader, PersistableValue, Value, XorCipher};

// =============================================================================
// Persistable Values
// =============================================================================

#[test]
fn load_edit_save() {
    let loader = Rc::new(MemoryLoader::new(Value::from(10)));
    let mut gold = PersistableValue::load(loader.clone()).unwrap();
    assert_eq!(gold.value(), &Value::from(10));

    *gold.value_mut() = Value::from(15);
    assert_eq!(loader.stored(), Value::from(10));
    gold.save().unwrap();
    assert_eq!(loader.stored(), Value::from(15));
    assert_eq!(loader.save_count(), 1);
}

#[test]
fn clones_share_the_loader() {
    let loader = Rc::new(MemoryLoader::new(Value::Unset));
    let first = PersistableValue::new(Value::from("a"), loader.clone());
    let mut second = first.clone();
    *second.value_mut() = Value::from("b");

    first.save().unwrap();
    second.save().unwrap();
    assert_eq!(loader.stored(), Value::from("b"));
    assert_eq!(loader.save_count(), 2);
}

// =============================================================================
// Encryption
// =============================================================================

#[test]
fn encrypt_then_decrypt() {
    let cipher = XorCipher::new(b"secret".to_vec());
    let mut record = Value::Unset;
    record.set("owner", "ada").unwrap();
    record.set("gold", 42).unwrap();

    let sealed = record.encrypt(&cipher).unwrap();
    assert!(sealed.as_binary().is_some());
    assert_eq!(sealed.decrypt(&cipher).unwrap(), record);
}

#[test]
fn unset_passes_through() {
    let cipher = XorCipher::new(b"k".to_vec());
    assert_eq!(Value::Unset.encrypt(&cipher).unwrap(), Value::Unset);
    assert_eq!(Value::Unset.decrypt(&cipher).unwrap(), Value::Unset);
}

#[test]
fn wrong_key_does_not_decode_to_the_original() {
    let value = Value::from("a fairly long word to scramble");
    let sealed = value.encrypt(&XorCipher::new(b"right".to_vec())).unwrap();
    let opened = sealed.decrypt(&XorCipher::new(b"wrong".to_vec()));
    assert!(opened.map_or(true, |v| v != value));
}

#[test]
fn cipher_is_symmetric() {
    let cipher = XorCipher::new(vec![1, 2, 3]);
    let data = b"tuple space".to_vec();
    assert_eq!(cipher.decrypt(&cipher.encrypt(&data)), data);
}
