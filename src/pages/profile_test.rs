use serde_json::json;

use super::*;
use crate::host::Host;
use crate::net::identity::IdentityError;
use crate::test_support::TestApp;

fn account_app() -> TestApp {
    let app = TestApp::new();
    app.store.insert(
        "users",
        "u1",
        json!({ "name": "asha", "email": "asha@example.com", "mobile": "98", "address": "12 MG Road" }),
    );
    app.start_auth_listener();
    app.sign_in_as("u1", "asha@example.com");
    app.load("#profile");
    app
}

fn guest_app() -> TestApp {
    let app = TestApp::new();
    app.start_auth_listener();
    app.identity.emit(None);
    app.run();
    app.load("#profile");
    app
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn auth_mode_starts_on_sign_up_and_toggles() {
    let mode = AuthMode::default();
    assert_eq!(mode, AuthMode::SignUp);
    assert_eq!(mode.title(), "Create Account");
    assert_eq!(mode.toggled(), AuthMode::SignIn);
    assert_eq!(mode.toggled().button_label(), "Sign In");
    assert_eq!(mode.toggled().toggled(), AuthMode::SignUp);
}

#[test]
fn avatar_falls_back_to_initial() {
    let user = CurrentUser { name: "ravi".to_owned(), ..CurrentUser::default() };
    assert_eq!(avatar_url(&user), "https://placehold.co/64x64/ea580c/white?text=R");
    let user = CurrentUser { photo_url: "https://img/me.png".to_owned(), ..user };
    assert_eq!(avatar_url(&user), "https://img/me.png");
}

// =============================================================
// Signed in
// =============================================================

#[test]
fn account_view_is_prefilled() {
    let app = account_app();
    assert_eq!(app.host.text(NAME_ID), "asha");
    assert_eq!(app.host.text(EMAIL_ID), "asha@example.com");
    assert_eq!(app.host.attribute(PIC_ID, "src").as_deref(), Some("https://placehold.co/64x64/ea580c/white?text=A"));
    assert!(app.host.is_hidden(AUTH_CONTAINER_ID));
    assert!(!app.host.is_hidden(DETAILS_ID));
    assert!(!app.host.is_hidden(LOGOUT_ID));
    assert_eq!(app.host.input_value(MOBILE_INPUT_ID).as_deref(), Some("98"));
    assert_eq!(app.host.input_value(ADDRESS_INPUT_ID).as_deref(), Some("12 MG Road"));
}

#[test]
fn profile_update_persists_and_updates_current_user() {
    let app = account_app();
    app.host.type_value(NAME_INPUT_ID, " Asha Rao ");
    app.host.type_value(ADDRESS_INPUT_ID, "7 Park Street");
    app.host.submit(UPDATE_FORM_ID);
    app.run();

    let stored = app.store.doc("users", "u1").unwrap();
    assert_eq!(stored["name"], "Asha Rao");
    assert_eq!(stored["address"], "7 Park Street");
    assert_eq!(stored["email"], "asha@example.com");
    let user = app.app().current_user().unwrap();
    assert_eq!(user.name, "Asha Rao");
    assert_eq!(user.address, "7 Park Street");
    assert_eq!(app.host.text(NAME_ID), "Asha Rao");
    assert_eq!(app.host.notices(), vec![PROFILE_SAVED_TEXT.to_owned()]);
    assert_eq!(app.host.text(UPDATE_BTN_ID), SAVE_LABEL);
    assert!(!app.host.is_disabled(UPDATE_BTN_ID));
}

#[test]
fn blank_field_blocks_update() {
    let app = account_app();
    app.host.type_value(MOBILE_INPUT_ID, "   ");
    app.host.submit(UPDATE_FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec![FILL_ALL_FIELDS_TEXT.to_owned()]);
    assert_eq!(app.app().current_user().unwrap().mobile, "98");
}

#[test]
fn failed_update_leaves_user_unchanged() {
    let app = account_app();
    app.host.type_value(NAME_INPUT_ID, "Someone Else");
    app.store.set_failing(true);
    app.host.submit(UPDATE_FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec![PROFILE_SAVE_FAILED_TEXT.to_owned()]);
    assert_eq!(app.app().current_user().unwrap().name, "asha");
    assert!(!app.host.is_disabled(UPDATE_BTN_ID));
}

#[test]
fn logout_signs_out_and_shows_guest_view() {
    let app = account_app();
    app.host.click(LOGOUT_ID, None);
    app.run();
    assert_eq!(app.identity.calls(), vec!["sign_out".to_owned()]);
    assert_eq!(app.host.notices(), vec![SIGNED_OUT_TEXT.to_owned()]);
    assert!(!app.app().is_signed_in());
    assert_eq!(app.host.text(NAME_ID), "Guest User");
    assert!(!app.host.is_hidden(AUTH_CONTAINER_ID));
}

// =============================================================
// Signed out
// =============================================================

#[test]
fn guest_view_offers_sign_up_first() {
    let app = guest_app();
    assert_eq!(app.host.text(NAME_ID), "Guest User");
    assert_eq!(app.host.text(EMAIL_ID), "Please log in");
    assert_eq!(app.host.attribute(PIC_ID, "src").as_deref(), Some(GUEST_PIC));
    assert!(app.host.is_hidden(DETAILS_ID));
    assert!(app.host.is_hidden(LOGOUT_ID));
    assert_eq!(app.host.text(AUTH_TITLE_ID), "Create Account");
    assert_eq!(app.host.text(TOGGLE_ID), "Already have an account? Sign In");

    app.host.click(TOGGLE_ID, None);
    assert_eq!(app.host.text(AUTH_TITLE_ID), "Sign In");
    assert_eq!(app.host.text(AUTH_BTN_ID), "Sign In");
    assert_eq!(app.host.text(TOGGLE_ID), "Don't have an account? Sign Up");
}

#[test]
fn credentials_are_required() {
    let app = guest_app();
    app.host.type_value(EMAIL_INPUT_ID, "asha@example.com");
    app.host.submit(AUTH_FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec![CREDENTIALS_REQUIRED_TEXT.to_owned()]);
    assert!(app.identity.calls().is_empty());
}

#[test]
fn sign_up_creates_profile_and_rerenders_account() {
    let app = guest_app();
    app.host.type_value(EMAIL_INPUT_ID, "new@example.com");
    app.host.type_value(PASSWORD_INPUT_ID, "secret1");
    app.host.submit(AUTH_FORM_ID);
    app.run();

    assert_eq!(app.identity.calls(), vec!["sign_up:new@example.com".to_owned()]);
    assert_eq!(app.host.notices(), vec![SIGNED_UP_TEXT.to_owned()]);
    assert!(app.store.doc("users", "uid-new@example.com").is_some());
    assert_eq!(app.host.text(NAME_ID), "new");
    assert!(!app.host.is_hidden(DETAILS_ID));
}

#[test]
fn sign_in_mode_uses_sign_in() {
    let app = guest_app();
    app.host.click(TOGGLE_ID, None);
    app.host.type_value(EMAIL_INPUT_ID, "old@example.com");
    app.host.type_value(PASSWORD_INPUT_ID, "secret1");
    app.host.submit(AUTH_FORM_ID);
    app.run();
    assert_eq!(app.identity.calls(), vec!["sign_in:old@example.com".to_owned()]);
    assert_eq!(app.host.notices(), vec![SIGNED_IN_TEXT.to_owned()]);
}

#[test]
fn rejected_credentials_are_reported() {
    let app = guest_app();
    app.identity.reject_with(IdentityError::Rejected("Incorrect email or password.".to_owned()));
    app.host.click(TOGGLE_ID, None);
    app.host.type_value(EMAIL_INPUT_ID, "old@example.com");
    app.host.type_value(PASSWORD_INPUT_ID, "wrong");
    app.host.submit(AUTH_FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec!["Error: Incorrect email or password.".to_owned()]);
    assert!(!app.app().is_signed_in());
}

#[test]
fn missing_auth_container_fails_the_page() {
    let app = TestApp::new();
    app.host.mark_missing(AUTH_CONTAINER_ID);
    let outcome = app.load("#profile");
    assert!(matches!(outcome, crate::router::LoadOutcome::Failed { .. }));
}

#[test]
fn google_sign_in_is_disabled_and_explained() {
    let app = guest_app();
    assert!(app.host.is_disabled(GOOGLE_BTN_ID));
    assert_eq!(app.host.attribute(GOOGLE_BTN_ID, "title").as_deref(), Some(GOOGLE_UNAVAILABLE_TEXT));
    assert!(!app.host.has_click_handler(GOOGLE_BTN_ID));
}

#[test]
fn google_button_is_optional() {
    let app = TestApp::new();
    app.host.mark_missing(GOOGLE_BTN_ID);
    app.start_auth_listener();
    app.identity.emit(None);
    app.run();
    let outcome = app.load("#profile");
    assert_eq!(outcome, crate::router::LoadOutcome::Rendered(crate::router::routes::PageId::Profile));
}
