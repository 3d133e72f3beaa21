// ============================================================================
// STORAGE - Durable client storage (localStorage / sessionStorage)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, Storage};

use crate::error::{AppError, AppResult};

/// String key/value store backing the session and cart id.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserArea {
    /// Survives reloads and new tabs
    Local,
    /// Survives reloads within the tab
    Session,
}

/// Web Storage backed store
#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage {
    area: BrowserArea,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self {
            area: BrowserArea::Local,
        }
    }

    pub fn session() -> Self {
        Self {
            area: BrowserArea::Session,
        }
    }

    fn storage(&self) -> AppResult<Storage> {
        let win = window().ok_or_else(|| AppError::Storage("no window".to_string()))?;
        let storage = match self.area {
            BrowserArea::Local => win.local_storage(),
            BrowserArea::Session => win.session_storage(),
        };
        storage
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Storage(format!("{:?} storage unavailable", self.area)))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|_| AppError::Storage(format!("failed to read '{}'", key)))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| AppError::Storage(format!("failed to write '{}'", key)))
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| AppError::Storage(format!("failed to remove '{}'", key)))
    }
}

/// In-memory store for non-browser targets and tests
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> AppResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Storage(format!("failed to serialize '{}': {}", key, e)))?;
    store.set(key, &json)
}

/// Corrupt entries read as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ Ignoring corrupt '{}' in storage: {}", key, e);
            None
        }
    }
}
