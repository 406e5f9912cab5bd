//! `order-request` behaviour: pickup request form for one store.
//!
//! The route is protected, but the behaviour re-checks its own preconditions
//! because a complete profile and a store id are also required.

#[cfg(test)]
#[path = "order_request_test.rs"]
mod order_request_test;

use std::rc::Rc;

use super::{PageBehavior, PageContext, PageError};
use crate::host::Host;
use crate::net::store::{StoreError, collections};
use crate::net::types::{PICKUP_STATUS_PENDING, PickupRequest};
use crate::router::Router;
use crate::router::hash::NavParams;
use crate::router::routes::PageId;
use crate::state::auth::CurrentUser;
use crate::state::location::Coords;
use crate::util::html::escape;

const FORM_ID: &str = "order-request-form";
const ADDRESS_ID: &str = "pickup-address";
const SLOT_ID: &str = "pickup-slot";
const NOTES_ID: &str = "pickup-notes";
const SUBMIT_ID: &str = "submit-request-btn";
const NOTE_ASSISTANT_ID: &str = "note-assistant-btn";

const SUBMIT_LABEL: &str = "Confirm Request";
const SUBMITTING_LABEL: &str = "Submitting...";

pub const PICKUP_SLOTS: [&str; 5] = [
    "Today, 4:00 PM - 6:00 PM",
    "Today, 6:00 PM - 8:00 PM",
    "Tomorrow, 10:00 AM - 12:00 PM",
    "Tomorrow, 12:00 PM - 2:00 PM",
    "Tomorrow, 4:00 PM - 6:00 PM",
];

pub const SUBMITTED_TEXT: &str = "Pickup Request Submitted Successfully!";
pub const NOTE_ASSISTANT_TEXT: &str = "Note suggestions are coming soon.";

/// Why the form cannot be shown; each sends the user somewhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Blocker {
    #[error("You must be logged in to place a request.")]
    SignedOut,
    #[error("Please update your Full Name, Mobile Number, and Address in your profile before placing a request.")]
    IncompleteProfile,
    #[error("Could not identify the store. Please go back and select a store again.")]
    MissingStore,
}

impl Blocker {
    pub fn redirect(self) -> PageId {
        match self {
            Blocker::SignedOut | Blocker::IncompleteProfile => PageId::Profile,
            Blocker::MissingStore => PageId::Stores,
        }
    }
}

/// Checked in order: signed in, complete profile, store id.
pub fn check_preconditions<'a, 'b>(
    user: Option<&'a CurrentUser>,
    store_id: Option<&'b str>,
) -> Result<(&'a CurrentUser, &'b str), Blocker> {
    let user = user.ok_or(Blocker::SignedOut)?;
    if !user.has_complete_profile() {
        return Err(Blocker::IncompleteProfile);
    }
    match store_id {
        Some(id) if !id.trim().is_empty() => Ok((user, id)),
        _ => Err(Blocker::MissingStore),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Please ensure Pickup Address and Pickup Slot are selected.")]
    MissingFields,
    #[error("Your location is not available yet. Please try again in a moment.")]
    NoLocation,
    #[error("You must be logged in to place a request.")]
    SignedOut,
    #[error("Failed to submit request. Please try again.")]
    Store(#[from] StoreError),
}

/// Form values as read at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub address: String,
    pub slot: String,
    pub notes: String,
}

impl RequestForm {
    fn read(host: &dyn Host) -> Self {
        let value = |id: &str| host.input_value(id).unwrap_or_default().trim().to_owned();
        Self { address: value(ADDRESS_ID), slot: value(SLOT_ID), notes: value(NOTES_ID) }
    }
}

/// Assemble the stored request. The address comes from the form, not the
/// profile, so a one-off pickup address does not touch the profile.
///
/// # Errors
///
/// [`SubmitError::MissingFields`] when the address or slot is empty,
/// [`SubmitError::NoLocation`] when no coordinate is known.
pub fn build_request(
    store_id: &str,
    user: &CurrentUser,
    form: &RequestForm,
    coords: Option<Coords>,
    now_ms: i64,
) -> Result<PickupRequest, SubmitError> {
    if form.address.is_empty() || form.slot.is_empty() {
        return Err(SubmitError::MissingFields);
    }
    let coords = coords.ok_or(SubmitError::NoLocation)?;
    Ok(PickupRequest {
        store_id: store_id.to_owned(),
        customer_id: user.id.clone(),
        customer_name: user.name.clone(),
        customer_mobile: user.mobile.clone(),
        customer_address: form.address.clone(),
        customer_location: coords.into(),
        pickup_slot: form.slot.clone(),
        notes: form.notes.clone(),
        status: PICKUP_STATUS_PENDING.to_owned(),
        created_at: now_ms,
    })
}

fn slot_options() -> String {
    let mut html = String::from(r#"<option value="">Select a time slot</option>"#);
    for slot in PICKUP_SLOTS {
        let slot = escape(slot);
        html.push_str(&format!(r#"<option value="{slot}">{slot}</option>"#));
    }
    html
}

async fn submit(router: &Router, store_id: &str) -> Result<String, SubmitError> {
    let app = router.app();
    let user = app.current_user().ok_or(SubmitError::SignedOut)?;
    let form = RequestForm::read(router.host().as_ref());
    let request = build_request(store_id, &user, &form, app.coords(), router.host().now_ms())?;
    let fields = serde_json::to_value(&request).map_err(StoreError::from)?;
    Ok(router.services().store.add(collections::PICKUP_REQUESTS, fields).await?)
}

async fn handle_submit(router: Router, store_id: Rc<str>) {
    let host = router.host().clone();
    host.set_text(SUBMIT_ID, SUBMITTING_LABEL);
    host.set_disabled(SUBMIT_ID, true);

    match submit(&router, &store_id).await {
        Ok(id) => {
            log::info!("pickup request {id} submitted for store {store_id}");
            host.notify(SUBMITTED_TEXT);
            router.navigate_to(PageId::OrderHistory, NavParams::new());
        }
        Err(e) => {
            if let SubmitError::Store(cause) = &e {
                log::error!("submitting pickup request failed: {cause}");
            }
            host.notify(&e.to_string());
        }
    }

    host.set_text(SUBMIT_ID, SUBMIT_LABEL);
    host.set_disabled(SUBMIT_ID, false);
}

pub struct OrderRequestPage;

#[async_trait::async_trait(?Send)]
impl PageBehavior for OrderRequestPage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        let user = cx.app().current_user();
        let store_id = cx.param("storeId");
        let (user, store_id) = match check_preconditions(user.as_ref(), store_id.as_deref()) {
            Ok(checked) => checked,
            Err(blocker) => {
                log::warn!("order request blocked: {blocker:?}");
                host.notify(&blocker.to_string());
                cx.router.navigate_to(blocker.redirect(), NavParams::new());
                return Ok(());
            }
        };
        let store_id: Rc<str> = Rc::from(store_id);

        PageContext::require(host.set_input_value(ADDRESS_ID, &user.address), ADDRESS_ID)?;
        PageContext::require(host.set_html(SLOT_ID, &slot_options()), SLOT_ID)?;
        PageContext::require(host.set_text(SUBMIT_ID, SUBMIT_LABEL), SUBMIT_ID)?;

        let router = cx.router.clone();
        let bound = host.on_submit(
            FORM_ID,
            Rc::new(move || {
                let task = handle_submit(router.clone(), store_id.clone());
                router.host().spawn(Box::pin(task));
            }),
        );
        PageContext::require(bound, FORM_ID)?;

        let notice_host = host.clone();
        host.on_click(
            NOTE_ASSISTANT_ID,
            Rc::new(move |_: Option<String>| notice_host.notify(NOTE_ASSISTANT_TEXT)),
        );
        Ok(())
    }
}
