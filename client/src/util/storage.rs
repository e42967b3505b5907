//! Best-effort key-value persistence with JSON helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every store in the client persists through `StorageAdapter`. The adapter
//! wraps a `KeyValueStore` backend (browser `localStorage` when hydrated, an
//! in-memory map natively or in tests, a file in the CLI) and owns the
//! no-throw contract: backend failures are logged and turned into `None` or
//! a no-op, never surfaced to callers.
//!
//! TRADE-OFFS
//! ==========
//! There are no retries and no write acknowledgements. Callers must not
//! assume a write landed.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Stable storage keys. Renaming any of these orphans existing user data.
pub mod keys {
    pub const AUTH_STATE: &str = "auth_state";
    pub const SAVED_CAREERS: &str = "saved:careers";
    pub const SAVED_JOBS: &str = "saved:jobs";
    pub const SAVED_BUSINESS: &str = "saved:business";
    pub const USER_LANGUAGE: &str = "user_language";
    pub const SAVE_PROMPT_SEEN: &str = "savePromptSeen";
    pub const PROGRESS_SNAPSHOT: &str = "careermap_progress_snapshot";
    pub const DARK_MODE: &str = "careermap_dark";
    pub const USER_PREFERENCES: &str = "user_preferences";
    pub const USER_FAVORITES: &str = "user_favorites";
}

const SENTINEL_KEY: &str = "__storage_test__";

/// Raw string key-value backend.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (quota, private mode, I/O).
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local backend. Cloning the `Rc` around one instance gives several
/// stores (or simulated tabs) a shared view of the same data.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    failing: Cell<bool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, as a full or disabled `localStorage` would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.get() { Err(StorageError::Unavailable) } else { Ok(()) }
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage` backend.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(feature = "hydrate")]
fn js_error(err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

#[cfg(feature = "hydrate")]
impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(|e| js_error(&e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(|e| js_error(&e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?.remove_item(key).map_err(|e| js_error(&e))
    }
}

/// A storage mutation observed from another browsing context.
///
/// `key` is `None` when the other context cleared the whole storage area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
}

impl StorageChange {
    pub fn key(key: &str) -> Self {
        Self { key: Some(key.to_owned()) }
    }

    /// True when this change may have touched `key`.
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().map_or(true, |k| k == key)
    }
}

/// Never-failing facade over a `KeyValueStore`.
#[derive(Clone)]
pub struct StorageAdapter {
    backend: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter").finish_non_exhaustive()
    }
}

impl StorageAdapter {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Adapter over a fresh, unshared `MemoryStorage`.
    pub fn memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    /// Read the raw value for `key`; `None` when absent or on any failure.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                leptos::logging::warn!("storage read failed for {key}: {e}");
                None
            }
        }
    }

    /// Best-effort write; failures are logged and dropped.
    pub fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set_item(key, value) {
            leptos::logging::warn!("storage write failed for {key}: {e}");
        }
    }

    /// Best-effort delete; failures are logged and dropped.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            leptos::logging::warn!("storage remove failed for {key}: {e}");
        }
    }

    /// Test the backend with a sentinel write followed by a delete.
    pub fn is_available(&self) -> bool {
        self.backend.set_item(SENTINEL_KEY, SENTINEL_KEY).is_ok() && self.backend.remove_item(SENTINEL_KEY).is_ok()
    }

    /// Load and decode a JSON value for `key`. Malformed JSON reads as absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                leptos::logging::warn!("discarding malformed JSON under {key}: {e}");
                None
            }
        }
    }

    /// Encode `value` as JSON and write it under `key`.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.write(key, &raw),
            Err(e) => leptos::logging::warn!("storage write failed for {key}: {}", StorageError::from(e)),
        }
    }

    /// Size of the raw value under `key`, counted in UTF-16 code units like
    /// the browser's storage quota.
    pub fn stored_len(&self, key: &str) -> usize {
        self.read(key).map_or(0, |raw| raw.encode_utf16().count())
    }
}

/// Keeps a `window` `storage` event listener registered until dropped.
#[cfg(feature = "hydrate")]
pub struct StorageListener {
    closure: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::StorageEvent)>,
}

#[cfg(feature = "hydrate")]
impl Drop for StorageListener {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback("storage", self.closure.as_ref().unchecked_ref());
        }
    }
}

/// Forward `storage` events raised by other tabs of the same origin.
///
/// Returns `None` outside a browser window.
#[cfg(feature = "hydrate")]
pub fn install_storage_listener<F>(mut handler: F) -> Option<StorageListener>
where
    F: FnMut(StorageChange) + 'static,
{
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let window = web_sys::window()?;
    let closure = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(move |event: web_sys::StorageEvent| {
        handler(StorageChange { key: event.key() });
    });
    window
        .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(StorageListener { closure })
}
