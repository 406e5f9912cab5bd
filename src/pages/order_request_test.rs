use serde_json::json;

use super::*;
use crate::test_support::TestApp;

const HERE: Coords = Coords { lat: 19.076, lng: 72.8777 };

fn complete_user() -> CurrentUser {
    CurrentUser {
        id: "u1".to_owned(),
        name: "Asha".to_owned(),
        mobile: "9876543210".to_owned(),
        address: "12 MG Road".to_owned(),
        ..CurrentUser::default()
    }
}

fn signed_in_app(profile: serde_json::Value) -> TestApp {
    let app = TestApp::new();
    app.store.insert("users", "u1", profile);
    app.start_auth_listener();
    app.sign_in_as("u1", "asha@example.com");
    app
}

fn complete_profile() -> serde_json::Value {
    json!({ "name": "Asha", "email": "asha@example.com", "mobile": "9876543210", "address": "12 MG Road" })
}

// =============================================================
// Preconditions
// =============================================================

#[test]
fn preconditions_are_checked_in_order() {
    let user = complete_user();
    let incomplete = CurrentUser { mobile: " ".to_owned(), ..complete_user() };
    assert_eq!(check_preconditions(None, Some("S1")), Err(Blocker::SignedOut));
    assert_eq!(check_preconditions(Some(&incomplete), None), Err(Blocker::IncompleteProfile));
    assert_eq!(check_preconditions(Some(&user), None), Err(Blocker::MissingStore));
    assert_eq!(check_preconditions(Some(&user), Some("")), Err(Blocker::MissingStore));
    assert_eq!(check_preconditions(Some(&user), Some("S1")), Ok((&user, "S1")));
}

#[test]
fn blockers_redirect_where_the_user_can_fix_them() {
    assert_eq!(Blocker::SignedOut.redirect(), PageId::Profile);
    assert_eq!(Blocker::IncompleteProfile.redirect(), PageId::Profile);
    assert_eq!(Blocker::MissingStore.redirect(), PageId::Stores);
}

#[test]
fn incomplete_profile_is_sent_to_profile() {
    let app = signed_in_app(json!({ "name": "Asha", "email": "asha@example.com" }));
    app.load("#order-request?storeId=S1");
    app.run();
    assert_eq!(app.host.notices(), vec![Blocker::IncompleteProfile.to_string()]);
    assert_eq!(app.host.hash(), "#profile");
    assert!(app.store.all("pickup_requests").is_empty());
}

#[test]
fn missing_store_id_is_sent_to_stores() {
    let app = signed_in_app(complete_profile());
    app.load("#order-request");
    app.run();
    assert_eq!(app.host.notices(), vec![Blocker::MissingStore.to_string()]);
    assert_eq!(app.host.hash(), "#stores");
}

// =============================================================
// Form
// =============================================================

#[test]
fn form_is_prefilled_with_slots() {
    let app = signed_in_app(complete_profile());
    app.load("#order-request?storeId=S1");
    assert_eq!(app.host.input_value(ADDRESS_ID).as_deref(), Some("12 MG Road"));
    let options = app.host.html(SLOT_ID);
    assert_eq!(options.matches("<option").count(), 6);
    assert!(options.contains(r#"<option value="">Select a time slot</option>"#));
    assert!(options.contains("Tomorrow, 10:00 AM - 12:00 PM"));
    assert_eq!(app.host.text(SUBMIT_ID), SUBMIT_LABEL);
}

#[test]
fn submit_writes_pending_request_and_opens_history() {
    let app = signed_in_app(complete_profile());
    app.app().set_location(Some(HERE), "Mumbai");
    app.load("#order-request?storeId=S1");
    app.host.type_value(SLOT_ID, PICKUP_SLOTS[2]);
    app.host.type_value(NOTES_ID, "  two bags  ");
    app.host.submit(FORM_ID);
    app.run();

    let requests = app.store.all("pickup_requests");
    assert_eq!(requests.len(), 1);
    let fields = &requests[0].1;
    assert_eq!(fields["storeId"], "S1");
    assert_eq!(fields["customerId"], "u1");
    assert_eq!(fields["customerName"], "Asha");
    assert_eq!(fields["customerMobile"], "9876543210");
    assert_eq!(fields["customerAddress"], "12 MG Road");
    assert_eq!(fields["customerLocation"], json!({ "latitude": 19.076, "longitude": 72.8777 }));
    assert_eq!(fields["pickupSlot"], PICKUP_SLOTS[2]);
    assert_eq!(fields["notes"], "two bags");
    assert_eq!(fields["status"], "Pending");
    assert_eq!(fields["createdAt"], 1_714_521_600_000_i64);

    assert!(app.host.notices().contains(&SUBMITTED_TEXT.to_owned()));
    assert_eq!(app.host.hash(), "#order-history");
}

#[test]
fn submit_without_slot_is_rejected() {
    let app = signed_in_app(complete_profile());
    app.app().set_location(Some(HERE), "Mumbai");
    app.load("#order-request?storeId=S1");
    app.host.submit(FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec![SubmitError::MissingFields.to_string()]);
    assert!(app.store.all("pickup_requests").is_empty());
    assert!(!app.host.is_disabled(SUBMIT_ID));
}

#[test]
fn submit_without_location_is_rejected() {
    let app = signed_in_app(complete_profile());
    app.load("#order-request?storeId=S1");
    app.host.type_value(SLOT_ID, PICKUP_SLOTS[0]);
    app.host.submit(FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec![SubmitError::NoLocation.to_string()]);
}

#[test]
fn store_failure_restores_the_button() {
    let app = signed_in_app(complete_profile());
    app.app().set_location(Some(HERE), "Mumbai");
    app.load("#order-request?storeId=S1");
    app.host.type_value(SLOT_ID, PICKUP_SLOTS[0]);
    app.store.set_failing(true);
    app.host.submit(FORM_ID);
    app.run();
    assert_eq!(app.host.notices(), vec!["Failed to submit request. Please try again.".to_owned()]);
    assert_eq!(app.host.text(SUBMIT_ID), SUBMIT_LABEL);
    assert!(!app.host.is_disabled(SUBMIT_ID));
    assert_eq!(app.host.hash(), "#order-request?storeId=S1");
}

#[test]
fn note_assistant_is_announced() {
    let app = signed_in_app(complete_profile());
    app.load("#order-request?storeId=S1");
    app.host.click(NOTE_ASSISTANT_ID, None);
    assert_eq!(app.host.notices(), vec![NOTE_ASSISTANT_TEXT.to_owned()]);
}
