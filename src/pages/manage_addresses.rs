//! `manage-addresses` behaviour: the saved address, or an empty state.
//! Every action leads to the profile page, where the address is edited.

#[cfg(test)]
#[path = "manage_addresses_test.rs"]
mod manage_addresses_test;

use std::rc::Rc;

use super::{PageBehavior, PageContext, PageError};
use crate::router::hash::NavParams;
use crate::router::routes::PageId;
use crate::state::auth::CurrentUser;

const CARD_ID: &str = "current-address-card";
const EMPTY_VIEW_ID: &str = "no-address-view";
const EMPTY_TITLE_ID: &str = "no-address-title";
const EMPTY_MESSAGE_ID: &str = "no-address-message";
const ADDRESS_TEXT_ID: &str = "current-address-text";
const EDIT_ID: &str = "edit-address-btn";
const ADD_ID: &str = "add-address-btn";

/// Which of the three views to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressView {
    LoginPrompt,
    Saved(String),
    Empty,
}

impl AddressView {
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        match user {
            None => AddressView::LoginPrompt,
            Some(user) if user.has_address() => AddressView::Saved(user.address.clone()),
            Some(_) => AddressView::Empty,
        }
    }
}

pub struct ManageAddressesPage;

#[async_trait::async_trait(?Send)]
impl PageBehavior for ManageAddressesPage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        let view = AddressView::for_user(cx.user.as_ref());
        let saved = matches!(view, AddressView::Saved(_));
        PageContext::require(host.set_hidden(CARD_ID, !saved), CARD_ID)?;
        PageContext::require(host.set_hidden(EMPTY_VIEW_ID, saved), EMPTY_VIEW_ID)?;

        let action = match &view {
            AddressView::LoginPrompt => {
                host.set_text(EMPTY_TITLE_ID, "Please Log In");
                host.set_text(EMPTY_MESSAGE_ID, "Log in to manage your saved address.");
                host.set_text(ADD_ID, "Log In / Sign Up");
                ADD_ID
            }
            AddressView::Saved(address) => {
                host.set_text(ADDRESS_TEXT_ID, address);
                EDIT_ID
            }
            AddressView::Empty => ADD_ID,
        };
        log::debug!("manage-addresses showing {view:?}");

        let router = cx.router.clone();
        let bound = host.on_click(
            action,
            Rc::new(move |_: Option<String>| router.navigate_to(PageId::Profile, NavParams::new())),
        );
        PageContext::require(bound, action)
    }
}
