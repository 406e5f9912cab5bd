//! `home` behaviour: location status plus the nearest stores.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use super::store::{WAITING_FOR_LOCATION_TEXT, bind_store_clicks, fetch_stores, rank_by_distance, render_cards};
use super::{PageBehavior, PageContext, PageError};
use crate::services::location::LOCATION_TEXT_ID;
use crate::util::html::notice;

const LIST_ID: &str = "home-store-list";

pub const NO_NEARBY_STORES_TEXT: &str = "No stores found nearby.";
pub const STORES_FAILED_TEXT: &str = "Could not load stores.";

pub struct HomePage;

#[async_trait::async_trait(?Send)]
impl PageBehavior for HomePage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        let location = cx.app().location();
        host.set_text(LOCATION_TEXT_ID, &location.status);

        // The location acquisition reloads this page once a fix exists.
        let Some(origin) = location.coords else {
            let wrote = host.set_html(LIST_ID, &notice("text-slate-500", WAITING_FOR_LOCATION_TEXT));
            return PageContext::require(wrote, LIST_ID);
        };
        PageContext::require(host.set_html(LIST_ID, &notice("text-slate-500", "Loading stores...")), LIST_ID)?;

        let stores = fetch_stores(cx.services().store.as_ref()).await;
        if !cx.is_current() {
            return Ok(());
        }
        match stores {
            Ok(stores) => {
                let ranked = rank_by_distance(&stores, origin);
                let nearest = ranked.iter().take(cx.config().nearby_store_limit);
                if ranked.is_empty() {
                    host.set_html(LIST_ID, &notice("text-slate-500", NO_NEARBY_STORES_TEXT));
                } else {
                    host.set_html(LIST_ID, &render_cards(nearest));
                    bind_store_clicks(&cx.router, LIST_ID);
                }
            }
            Err(e) => {
                log::error!("fetching stores for home failed: {e}");
                host.set_html(LIST_ID, &notice("text-red-500", STORES_FAILED_TEXT));
            }
        }
        Ok(())
    }
}
