//! Process-wide application state shared by the router and page behaviours.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;

use super::auth::{AuthCheckSignal, CurrentUser, ProfileUpdate};
use super::location::{Coords, LocationFix};
use super::session_hint::SessionHint;

/// Owned application state.
///
/// Readers get clones; the setters are crate-private and called only from the
/// auth listener, the location acquisition and the profile page's own update.
pub struct AppState {
    user: RefCell<Option<CurrentUser>>,
    location: RefCell<LocationFix>,
    auth_check: AuthCheckSignal,
    hint: SessionHint,
}

impl AppState {
    pub fn new(hint: SessionHint) -> Self {
        Self {
            user: RefCell::new(None),
            location: RefCell::new(LocationFix::default()),
            auth_check: AuthCheckSignal::new(),
            hint,
        }
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn location(&self) -> LocationFix {
        self.location.borrow().clone()
    }

    pub fn coords(&self) -> Option<Coords> {
        self.location.borrow().coords
    }

    pub fn auth_check(&self) -> &AuthCheckSignal {
        &self.auth_check
    }

    pub fn session_hint(&self) -> &SessionHint {
        &self.hint
    }

    /// Replace the current user, returning the previous value.
    pub(crate) fn set_user(&self, user: Option<CurrentUser>) -> Option<CurrentUser> {
        self.user.replace(user)
    }

    /// Apply a persisted profile edit to the in-memory user.
    pub(crate) fn apply_profile_update(&self, update: &ProfileUpdate) {
        if let Some(user) = self.user.borrow_mut().as_mut() {
            user.name.clone_from(&update.name);
            user.mobile.clone_from(&update.mobile);
            user.address.clone_from(&update.address);
        }
    }

    pub(crate) fn set_location(&self, coords: Option<Coords>, status: impl Into<String>) {
        *self.location.borrow_mut() = LocationFix { coords, status: status.into() };
    }

    pub(crate) fn set_location_status(&self, status: impl Into<String>) {
        self.location.borrow_mut().status = status.into();
    }
}
