//! `profile` behaviour: account card with the profile form when signed in,
//! guest card with the sign-in / sign-up form when signed out.
//!
//! The auth listener reloads this route on every user change, so `init` only
//! ever renders one of the two views and never switches in place.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::cell::Cell;
use std::rc::Rc;

use super::{PageBehavior, PageContext, PageError};
use crate::net::store::collections;
use crate::router::Router;
use crate::state::auth::{CurrentUser, ProfileUpdate};

const PIC_ID: &str = "profile-pic";
const NAME_ID: &str = "profile-name";
const EMAIL_ID: &str = "profile-email";
const AUTH_CONTAINER_ID: &str = "auth-container";
const LOGOUT_ID: &str = "logout-btn";
const DETAILS_ID: &str = "profile-details-container";

const UPDATE_FORM_ID: &str = "profile-update-form";
const NAME_INPUT_ID: &str = "profile-name-input";
const MOBILE_INPUT_ID: &str = "profile-mobile";
const ADDRESS_INPUT_ID: &str = "profile-address";
const UPDATE_BTN_ID: &str = "profile-update-btn";

const AUTH_FORM_ID: &str = "email-auth-form";
const AUTH_TITLE_ID: &str = "auth-title";
const AUTH_BTN_ID: &str = "main-auth-btn";
const TOGGLE_ID: &str = "toggle-auth-mode";
const EMAIL_INPUT_ID: &str = "auth-email";
const PASSWORD_INPUT_ID: &str = "auth-password";
const GOOGLE_BTN_ID: &str = "google-signin-btn";

const GUEST_PIC: &str = "https://placehold.co/64x64/cccccc/333333?text=User";
const SAVE_LABEL: &str = "Save Details";

pub const FILL_ALL_FIELDS_TEXT: &str = "Please fill in all required fields (Name, Mobile, Address).";
pub const PROFILE_SAVED_TEXT: &str = "Profile updated successfully!";
pub const PROFILE_SAVE_FAILED_TEXT: &str = "Error updating profile. Please try again.";
pub const CREDENTIALS_REQUIRED_TEXT: &str = "Please enter both email and password.";
pub const SIGNED_IN_TEXT: &str = "Signed in successfully!";
pub const SIGNED_UP_TEXT: &str = "Account created successfully!";
pub const SIGNED_OUT_TEXT: &str = "Logged out successfully.";
pub const GOOGLE_UNAVAILABLE_TEXT: &str = "Google sign-in is not available. Please use email and password.";

/// Which credential form the guest view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignUp,
    SignIn,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignUp => AuthMode::SignIn,
            AuthMode::SignIn => AuthMode::SignUp,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::SignUp => "Create Account",
            AuthMode::SignIn => "Sign In",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            AuthMode::SignUp => "Sign Up",
            AuthMode::SignIn => "Sign In",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            AuthMode::SignUp => "Already have an account? Sign In",
            AuthMode::SignIn => "Don't have an account? Sign Up",
        }
    }
}

/// Avatar URL: the stored photo, or a placeholder with the name's initial.
pub fn avatar_url(user: &CurrentUser) -> String {
    if user.photo_url.is_empty() {
        format!("https://placehold.co/64x64/ea580c/white?text={}", user.initial())
    } else {
        user.photo_url.clone()
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

/// Read the update form; `None` when any field is blank.
fn read_update(router: &Router) -> Option<ProfileUpdate> {
    let host = router.host();
    let value = |id: &str| host.input_value(id).unwrap_or_default().trim().to_owned();
    let update = ProfileUpdate {
        name: value(NAME_INPUT_ID),
        mobile: value(MOBILE_INPUT_ID),
        address: value(ADDRESS_INPUT_ID),
    };
    let complete = [&update.name, &update.mobile, &update.address].iter().all(|f| !f.is_empty());
    complete.then_some(update)
}

async fn save_profile(router: Router) {
    let host = router.host().clone();
    let Some(user) = router.app().current_user() else {
        log::warn!("profile update submitted while signed out");
        return;
    };
    let Some(update) = read_update(&router) else {
        host.notify(FILL_ALL_FIELDS_TEXT);
        return;
    };
    host.set_text(UPDATE_BTN_ID, "Saving...");
    host.set_disabled(UPDATE_BTN_ID, true);

    let written = match serde_json::to_value(&update) {
        Ok(fields) => router.services().store.update(collections::USERS, &user.id, fields).await,
        Err(e) => Err(e.into()),
    };
    match written {
        Ok(()) => {
            log::info!("profile updated for {}", user.id);
            router.app().apply_profile_update(&update);
            host.set_text(NAME_ID, &update.name);
            host.notify(PROFILE_SAVED_TEXT);
        }
        Err(e) => {
            log::error!("updating profile for {} failed: {e}", user.id);
            host.notify(PROFILE_SAVE_FAILED_TEXT);
        }
    }
    host.set_text(UPDATE_BTN_ID, SAVE_LABEL);
    host.set_disabled(UPDATE_BTN_ID, false);
}

async fn sign_out(router: Router) {
    match router.services().identity.sign_out().await {
        Ok(()) => router.host().notify(SIGNED_OUT_TEXT),
        Err(e) => log::error!("sign-out failed: {e}"),
    }
}

async fn authenticate(router: Router, mode: AuthMode) {
    let host = router.host().clone();
    let email = host.input_value(EMAIL_INPUT_ID).unwrap_or_default().trim().to_owned();
    let password = host.input_value(PASSWORD_INPUT_ID).unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        host.notify(CREDENTIALS_REQUIRED_TEXT);
        return;
    }
    let identity = router.services().identity.clone();
    let result = match mode {
        AuthMode::SignIn => identity.sign_in(&email, &password).await.map(|_| SIGNED_IN_TEXT),
        AuthMode::SignUp => identity.sign_up(&email, &password).await.map(|_| SIGNED_UP_TEXT),
    };
    match result {
        Ok(text) => host.notify(text),
        Err(e) => {
            log::warn!("{mode:?} for {email} failed: {e}");
            host.notify(&format!("Error: {e}"));
        }
    }
}

#[derive(Default)]
pub struct ProfilePage {
    mode: Rc<Cell<AuthMode>>,
}

impl ProfilePage {
    fn show_account(cx: &PageContext, user: &CurrentUser) -> Result<(), PageError> {
        let host = cx.host();
        host.set_text(NAME_ID, or_placeholder(&user.name, "User"));
        host.set_text(EMAIL_ID, or_placeholder(&user.email, "No email"));
        host.set_attribute(PIC_ID, "src", &avatar_url(user));
        host.set_hidden(AUTH_CONTAINER_ID, true);
        host.set_hidden(DETAILS_ID, false);
        host.set_hidden(LOGOUT_ID, false);

        PageContext::require(host.set_input_value(NAME_INPUT_ID, &user.name), NAME_INPUT_ID)?;
        host.set_input_value(MOBILE_INPUT_ID, &user.mobile);
        host.set_input_value(ADDRESS_INPUT_ID, &user.address);

        let router = cx.router.clone();
        host.on_click(
            LOGOUT_ID,
            Rc::new(move |_: Option<String>| router.host().spawn(Box::pin(sign_out(router.clone())))),
        );
        let router = cx.router.clone();
        let bound = host.on_submit(
            UPDATE_FORM_ID,
            Rc::new(move || router.host().spawn(Box::pin(save_profile(router.clone())))),
        );
        PageContext::require(bound, UPDATE_FORM_ID)
    }

    fn show_guest(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        host.set_text(NAME_ID, "Guest User");
        host.set_text(EMAIL_ID, "Please log in");
        host.set_attribute(PIC_ID, "src", GUEST_PIC);
        host.set_hidden(AUTH_CONTAINER_ID, false);
        host.set_hidden(DETAILS_ID, true);
        host.set_hidden(LOGOUT_ID, true);

        let apply_mode = {
            let host = host.clone();
            move |mode: AuthMode| {
                host.set_text(AUTH_TITLE_ID, mode.title());
                host.set_text(AUTH_BTN_ID, mode.button_label());
                host.set_text(TOGGLE_ID, mode.toggle_label());
            }
        };
        apply_mode(self.mode.get());

        let mode = self.mode.clone();
        host.on_click(
            TOGGLE_ID,
            Rc::new(move |_: Option<String>| {
                mode.set(mode.get().toggled());
                apply_mode(mode.get());
            }),
        );

        // Only email/password is supported.
        host.set_disabled(GOOGLE_BTN_ID, true);
        host.set_attribute(GOOGLE_BTN_ID, "title", GOOGLE_UNAVAILABLE_TEXT);

        let (router, mode) = (cx.router.clone(), self.mode.clone());
        let bound = host.on_submit(
            AUTH_FORM_ID,
            Rc::new(move || router.host().spawn(Box::pin(authenticate(router.clone(), mode.get())))),
        );
        PageContext::require(bound, AUTH_FORM_ID)
    }
}

#[async_trait::async_trait(?Send)]
impl PageBehavior for ProfilePage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        PageContext::require(host.set_hidden(AUTH_CONTAINER_ID, true), AUTH_CONTAINER_ID)?;
        PageContext::require(host.set_hidden(DETAILS_ID, true), DETAILS_ID)?;

        match &cx.user {
            Some(user) => Self::show_account(cx, user),
            None => self.show_guest(cx),
        }
    }
}
