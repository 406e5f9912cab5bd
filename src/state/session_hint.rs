//! Session-scoped, non-authoritative login hint.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lets the auth gate turn away users who were signed out earlier in this
//! browsing session without waiting for the identity round trip. The hint is
//! advisory: the auth listener rewrites it on every authoritative transition.

#[cfg(test)]
#[path = "session_hint_test.rs"]
mod session_hint_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Minimal string key/value storage (browser `sessionStorage` in production).
pub trait HintStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, used when no browser storage is available.
#[derive(Debug, Default)]
pub struct MemoryHintStorage {
    items: RefCell<HashMap<String, String>>,
}

impl HintStorage for MemoryHintStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintState {
    /// Nothing recorded yet this session.
    Unknown,
    SignedIn,
    SignedOut,
}

pub struct SessionHint {
    storage: Rc<dyn HintStorage>,
    key: String,
}

impl SessionHint {
    pub fn new(storage: Rc<dyn HintStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    pub fn read(&self) -> HintState {
        match self.storage.get(&self.key).as_deref() {
            Some("true") => HintState::SignedIn,
            Some("false") => HintState::SignedOut,
            _ => HintState::Unknown,
        }
    }

    /// True only when the session has positively recorded a sign-out.
    pub fn is_signed_out(&self) -> bool {
        self.read() == HintState::SignedOut
    }

    pub fn write(&self, signed_in: bool) {
        self.storage.set(&self.key, if signed_in { "true" } else { "false" });
    }

    pub fn clear(&self) {
        self.storage.remove(&self.key);
    }
}
