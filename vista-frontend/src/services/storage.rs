//! `window.localStorage` as a [`KeyValueStore`]
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use vista_common::preferences::{KeyValueStore, PreferenceStore, StoreError};

const PROBE_KEY: &str = "__vista__";

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// The page's local storage.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open local storage, checking that it accepts writes.
    ///
    /// Private browsing modes can expose a store that throws on every write.
    pub fn open() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|err| StoreError::Unavailable(js_message(&err)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;

        let mut store = Self { storage };
        store.set(PROBE_KEY, PROBE_KEY)?;
        store.remove(PROBE_KEY)?;
        Ok(store)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| StoreError::Failed {
                key: key.to_string(),
                message: js_message(&err),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Failed {
                key: key.to_string(),
                message: js_message(&err),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StoreError::Failed {
                key: key.to_string(),
                message: js_message(&err),
            })
    }
}

/// Preferences backed by local storage, or by memory alone if it is unusable.
#[must_use]
pub fn open_preferences() -> PreferenceStore<Box<dyn KeyValueStore>> {
    match LocalStorage::open() {
        Ok(storage) => PreferenceStore::new(Box::new(storage)),
        Err(err) => {
            warn!("Keeping preferences for this session only: {err}");
            PreferenceStore::session_only()
        }
    }
}
