//! `sessionStorage`-backed login hint storage.

use crate::state::session_hint::HintStorage;

pub struct BrowserSessionStorage {
    storage: web_sys::Storage,
}

impl BrowserSessionStorage {
    /// `None` when the page has no session storage (e.g. blocked by privacy
    /// settings).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl HintStorage for BrowserSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("session storage rejected {key}");
        }
    }

    fn remove(&self, key: &str) {
        if self.storage.remove_item(key).is_err() {
            log::warn!("session storage could not remove {key}");
        }
    }
}
