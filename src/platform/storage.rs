//! Key/value persistence port
//!
//! The game persists two integers and two booleans. Backends only move raw
//! strings; the typed helpers are provided methods so every backend encodes
//! values the same way. A missing or failing backend reads as defaults and
//! writes as no-ops.

use std::collections::HashMap;

/// String key/value store
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str);

    /// Integer stored as decimal text. Missing reads as `default`. Only the
    /// leading digits count (`"12abc"` is 12); text without any reads as 0.
    fn load_int(&self, key: &str, default: i64) -> i64 {
        match self.get_item(key) {
            Some(raw) => leading_int(&raw).unwrap_or(0),
            None => default,
        }
    }

    fn save_int(&mut self, key: &str, value: i64) {
        self.set_item(key, &value.to_string());
    }

    /// Boolean stored as "1"/"0"; anything other than "1" is false
    fn load_bool(&self, key: &str, default: bool) -> bool {
        match self.get_item(key) {
            Some(raw) => raw == "1",
            None => default,
        }
    }

    fn save_bool(&mut self, key: &str, value: bool) {
        self.set_item(key, if value { "1" } else { "0" });
    }
}

/// Optional sign plus the run of digits at the start of `raw`
fn leading_int(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    text[..sign_len + digits].parse().ok()
}

/// In-memory store for tests and native runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable - preferences and high score will not persist");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            let _ = storage.set_item(key, value);
        }
    }
}
