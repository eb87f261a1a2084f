//! `localStorage` settings store
//!
//! All preferences live in one JSON object under the `settings` key, e.g.
//! `{"frames":"30","velocity":"1","volume":"80","muted":"false"}`.

use cinta_core::{Error, Result, SettingsStore};
use gloo_storage::{LocalStorage, Storage};
use serde_json::{Map, Value};

const STORAGE_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSettingsStore;

impl LocalSettingsStore {
    pub fn new() -> Self {
        Self
    }

    fn read(&self) -> Map<String, Value> {
        LocalStorage::get(STORAGE_KEY).unwrap_or_default()
    }

    fn write(&self, key: &str, entries: &Map<String, Value>) -> Result<()> {
        LocalStorage::set(STORAGE_KEY, entries)
            .map_err(|e| Error::storage_write(key, e.to_string()))
    }
}

impl SettingsStore for LocalSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read().remove(key)? {
            Value::String(value) => Some(value),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read();
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write(key, &entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read();
        if entries.remove(key).is_some() {
            self.write(key, &entries)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        LocalStorage::delete(STORAGE_KEY);
        Ok(())
    }
}
