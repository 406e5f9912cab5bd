//! Auth-session state: the signed-in user's profile and the one-shot
//! "initial auth check finished" signal.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth gate suspends protected-route rendering on [`AuthCheckSignal`]
//! until the auth listener has processed the identity provider's first
//! transition; afterwards `CurrentUser` is authoritative.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::net::identity::AuthIdentity;
use crate::net::types::Timestamp;

/// Signed-in user, mirroring the `users/{id}` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentUser {
    /// Identity-provider uid; the document key, not a stored field.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl CurrentUser {
    /// Profile written for an identity that has no document yet.
    pub fn new_default(identity: &AuthIdentity, now_ms: i64) -> Self {
        let email = identity.email.clone().unwrap_or_default();
        let name = identity
            .display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());
        Self {
            id: identity.uid.clone(),
            name,
            email,
            photo_url: identity.photo_url.clone().unwrap_or_default(),
            mobile: String::new(),
            address: String::new(),
            created_at: Some(Timestamp::Millis(now_ms)),
        }
    }

    /// Name, mobile and address are all required before placing a request.
    pub fn has_complete_profile(&self) -> bool {
        [&self.name, &self.mobile, &self.address].iter().all(|f| !f.trim().is_empty())
    }

    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// Uppercase initial for avatar placeholders.
    pub fn initial(&self) -> char {
        self.name.chars().next().map_or('U', |c| c.to_ascii_uppercase())
    }
}

/// Editable profile fields written by the profile page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub mobile: String,
    pub address: String,
}

enum SignalState {
    Pending(Vec<oneshot::Sender<()>>),
    Resolved,
}

/// One-shot completion signal: `pending -> resolved` exactly once.
///
/// Waiters registered while pending are released in registration order;
/// waiters arriving after resolution return immediately.
pub struct AuthCheckSignal {
    state: RefCell<SignalState>,
}

impl Default for AuthCheckSignal {
    fn default() -> Self {
        Self { state: RefCell::new(SignalState::Pending(Vec::new())) }
    }
}

impl AuthCheckSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.state.borrow(), SignalState::Resolved)
    }

    /// Resolve the signal. Returns `true` only for the call that resolved it.
    pub fn resolve(&self) -> bool {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), SignalState::Resolved);
        match previous {
            SignalState::Pending(waiters) => {
                for waiter in waiters {
                    let _ = waiter.send(());
                }
                true
            }
            SignalState::Resolved => false,
        }
    }

    /// Suspend until resolved.
    pub async fn wait(&self) {
        let rx = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                SignalState::Resolved => return,
                SignalState::Pending(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    rx
                }
            }
        };
        // A dropped sender only happens when the signal itself is dropped.
        let _ = rx.await;
    }

    pub fn waiter_count(&self) -> usize {
        match &*self.state.borrow() {
            SignalState::Pending(waiters) => waiters.len(),
            SignalState::Resolved => 0,
        }
    }
}
