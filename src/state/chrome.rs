//! Shell chrome driven by the router: document title and active nav tab.

#[cfg(test)]
#[path = "chrome_test.rs"]
mod chrome_test;

use crate::router::routes::PageId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChromeState {
    pub title: String,
    pub active_tab: Option<PageId>,
}

impl ChromeState {
    pub fn is_active(&self, page: PageId) -> bool {
        self.active_tab == Some(page)
    }
}
