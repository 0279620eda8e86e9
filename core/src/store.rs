use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::StoreError;

/// Key-value bag owned by the host that survives between sessions.
///
/// Engines only touch it after a state transition has completed, never while
/// computing one.
pub trait SettingsStore {
    fn get_value(&self, key: &str) -> Option<Value>;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed access on top of [`SettingsStore`].
pub trait SettingsStoreExt: SettingsStore {
    /// Reads `key`, treating a value of the wrong shape as missing.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("Ignoring malformed setting {key}: {err}");
                None
            }
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set_value(key, serde_json::to_value(value)?)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}

/// Handle to the store shared by the manager and the engines it owns.
pub type SharedStore = Rc<RefCell<dyn SettingsStore>>;

pub fn shared_store<S: SettingsStore + 'static>(store: S) -> SharedStore {
    Rc::new(RefCell::new(store))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let mut store = MemoryStore::new();
        store.set("answer", &42_u64).unwrap();
        assert_eq!(store.get::<u64>("answer"), Some(42));
        assert_eq!(store.get::<u64>("missing"), None);
    }

    #[test]
    fn wrong_shape_reads_as_missing() {
        let mut store = MemoryStore::new();
        store.set("answer", &"forty-two").unwrap();
        assert_eq!(store.get::<u64>("answer"), None);
        assert_eq!(store.get::<String>("answer").as_deref(), Some("forty-two"));
    }

    #[test]
    fn shared_handle_sees_writes() {
        let store = shared_store(MemoryStore::new());
        let other = Rc::clone(&store);
        store.borrow_mut().set("k", &1_u8).unwrap();
        assert_eq!(other.borrow().get::<u8>("k"), Some(1));
    }
}
