//! Bottom navigation bar.
//!
//! SYSTEM CONTEXT
//! ==============
//! Tabs are plain fragment links; the router picks up the hash change. The
//! active tab follows the chrome signal the router writes on every load, so
//! pages without a tab (store details, help) leave every tab inactive.

#[cfg(test)]
#[path = "bottom_nav_test.rs"]
mod bottom_nav_test;

use leptos::prelude::*;

use crate::router::hash::{NavParams, build_hash};
use crate::router::routes::PageId;
use crate::state::chrome::ChromeState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tab {
    pub page: PageId,
    pub label: &'static str,
}

pub const TABS: [Tab; 4] = [
    Tab { page: PageId::Home, label: "Home" },
    Tab { page: PageId::Stores, label: "Stores" },
    Tab { page: PageId::OrderHistory, label: "Orders" },
    Tab { page: PageId::Profile, label: "Account" },
];

fn tab_class(chrome: &ChromeState, page: PageId) -> &'static str {
    if chrome.is_active(page) {
        "bottom-nav__tab bottom-nav__tab--active"
    } else {
        "bottom-nav__tab"
    }
}

fn tab_href(page: PageId) -> String {
    build_hash(page, &NavParams::new())
}

/// Fixed tab bar below the content region.
#[component]
pub fn BottomNav() -> impl IntoView {
    let chrome = expect_context::<RwSignal<ChromeState>>();

    view! {
        <nav class="bottom-nav">
            {TABS
                .into_iter()
                .map(|tab| {
                    let class = move || chrome.with(|c| tab_class(c, tab.page));
                    view! {
                        <a href=tab_href(tab.page) class=class data-page=tab.page.as_str()>
                            {tab.label}
                        </a>
                    }
                })
                .collect_view()}
        </nav>
    }
}
