//! Durable key/value persistence.
//!
//! `LocalStore` wraps the browser's `localStorage`; `MemoryStore` keeps values in
//! process and stands in when `localStorage` is unavailable (private browsing,
//! sandboxed iframes) and in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("local storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode `{key}`: {reason}")]
    Encode { key: String, reason: String },
}

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        let win = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no global `window`".into()))?;
        match win.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is null".into())),
            Err(e) => Err(StorageError::Unavailable(format!("{:?}", e))),
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // QuotaExceededError lands here
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read a boolean setting stored as "1"/"0" (or "true"/"false").
pub fn load_flag(store: &dyn KeyValueStore, key: &str, default: bool) -> bool {
    match store.get_item(key) {
        Ok(Some(v)) => match v.as_str() {
            "1" | "true" => true,
            "0" | "false" => false,
            _ => default,
        },
        _ => default,
    }
}

pub fn save_flag(store: &dyn KeyValueStore, key: &str, value: bool) -> Result<(), StorageError> {
    store.set_item(key, if value { "1" } else { "0" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn flags_fall_back_to_default_on_garbage() {
        let store = MemoryStore::new();
        assert!(load_flag(&store, "cv_setting_show_axes", true));
        save_flag(&store, "cv_setting_show_axes", false).unwrap();
        assert!(!load_flag(&store, "cv_setting_show_axes", true));
        store.set_item("cv_setting_show_axes", "maybe").unwrap();
        assert!(load_flag(&store, "cv_setting_show_axes", true));
        store.set_item("cv_setting_show_axes", "true").unwrap();
        assert!(load_flag(&store, "cv_setting_show_axes", false));
    }

    #[test]
    fn storage_errors_render_key_and_reason() {
        let e = StorageError::Write {
            key: "cube-positions".into(),
            reason: "QuotaExceededError".into(),
        };
        assert_eq!(
            e.to_string(),
            "failed to write `cube-positions`: QuotaExceededError"
        );
    }
}
