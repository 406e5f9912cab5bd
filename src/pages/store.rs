//! `stores` and `store-details` behaviour.
//!
//! DESIGN
//! ======
//! Both routes share this behaviour; `PageContext::page` selects the view.
//! The store list is fetched once and cached for the life of the app;
//! distances are recomputed from the current location on every render so a
//! late location fix is reflected without refetching.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::rc::Rc;

use super::{PageBehavior, PageContext, PageError};
use crate::host::Host;
use crate::net::store::{DocumentStore, Query, StoreError, collections};
use crate::net::types::{Product, Store, format_amount};
use crate::router::Router;
use crate::router::hash::NavParams;
use crate::router::routes::PageId;
use crate::state::location::Coords;
use crate::util::distance::{distance_km, distance_label};
use crate::util::html::{escape, notice};

pub const STORE_PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x250";
pub const WAITING_FOR_LOCATION_TEXT: &str = "Getting your location...";

/// Sort key for stores without a stored location.
const UNKNOWN_DISTANCE_KM: f64 = 9999.0;

const LIST_ID: &str = "store-list-container-page";
const SEARCH_ID: &str = "store-search-input-page";

const NAME_ID: &str = "store-details-name";
const IMAGE_ID: &str = "store-detail-image";
const SHORT_ID: &str = "store-details-services-short";
const RATING_ID: &str = "store-details-rating";
const DISTANCE_ID: &str = "store-details-distance";
const HOURS_ID: &str = "store-details-hours";
const SERVICES_ID: &str = "store-service-list";
const PLACE_REQUEST_ID: &str = "place-request-btn";

const STORE_HOURS_TEXT: &str = "Open: 9:00 AM - 9:00 PM";
const DEFAULT_SERVICES_TEXT: &str = "Laundry, Ironing, Dry Cleaning";

pub const MISSING_STORE_ID_TEXT: &str = "Store ID not found. Redirecting to stores list.";
pub const STORE_NOT_FOUND_TEXT: &str = "Store not found.";
pub const LOGIN_TO_REQUEST_TEXT: &str = "Please log in to place a request.";
pub const NO_MATCHES_TEXT: &str = "No stores match your search.";
pub const NO_SERVICES_TEXT: &str = "No services listed for this store.";

/// A store with its distance from the current location.
#[derive(Clone, Debug, PartialEq)]
pub struct NearbyStore {
    pub store: Store,
    /// `None` when the store has no stored location.
    pub distance_km: Option<f64>,
}

impl NearbyStore {
    fn sort_key(&self) -> f64 {
        self.distance_km.unwrap_or(UNKNOWN_DISTANCE_KM)
    }
}

/// Attach distances from `origin` and sort nearest first. Stores without a
/// location sort last.
pub fn rank_by_distance(stores: &[Store], origin: Coords) -> Vec<NearbyStore> {
    let mut ranked: Vec<NearbyStore> = stores
        .iter()
        .map(|store| NearbyStore {
            distance_km: store.location.map(|p| distance_km(origin, p.into())),
            store: store.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
    ranked
}

/// Case-insensitive name search; unnamed stores never match.
pub fn filter_by_name<'a>(stores: &'a [NearbyStore], term: &str) -> Vec<&'a NearbyStore> {
    let term = term.trim().to_lowercase();
    stores
        .iter()
        .filter(|s| s.store.name.as_deref().is_some_and(|n| n.to_lowercase().contains(&term)))
        .collect()
}

/// Clickable store card; the store id travels in `data-key`.
pub fn store_card(entry: &NearbyStore) -> String {
    let store = &entry.store;
    let image = store.cover_image.as_deref().unwrap_or(STORE_PLACEHOLDER_IMAGE);
    let description = store.short_description.as_deref().unwrap_or("Laundry & Dry Cleaning");
    let distance = entry.distance_km.map_or_else(|| "N/A".to_owned(), distance_label);
    format!(
        r#"<div class="bg-white rounded-xl shadow-md overflow-hidden hover:shadow-lg transition cursor-pointer" data-key="{id}">
  <img class="h-40 w-full object-cover" src="{image}" alt="{name}">
  <div class="p-4">
    <h3 class="text-lg font-bold text-slate-800 mb-1">{name}</h3>
    <p class="text-sm text-slate-500 mb-2">{description}</p>
    <div class="flex items-center text-sm">
      <i class="fas fa-star text-yellow-400 mr-1"></i>
      <span class="font-semibold text-slate-700">{rating}</span>
      <span class="mx-2 text-slate-300">|</span>
      <i class="fas fa-location-dot text-slate-400 mr-1"></i>
      <span>{distance}</span>
    </div>
  </div>
</div>"#,
        id = escape(&store.id),
        image = escape(image),
        name = escape(store.display_name()),
        description = escape(description),
        rating = store.rating_label(),
    )
}

pub fn render_cards<'a>(entries: impl IntoIterator<Item = &'a NearbyStore>) -> String {
    entries.into_iter().map(store_card).collect::<Vec<_>>().join("\n")
}

/// Fetch every store profile, skipping documents that do not decode.
///
/// # Errors
///
/// Returns the store error if the query itself fails.
pub async fn fetch_stores(store: &dyn DocumentStore) -> Result<Vec<Store>, StoreError> {
    let docs = store.query(collections::STORES, &Query::new()).await?;
    Ok(docs
        .iter()
        .filter_map(|doc| match Store::from_document(doc) {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("skipping store {}: {e}", doc.id);
                None
            }
        })
        .collect())
}

/// Navigate to a store's details when a card inside `container` is clicked.
pub fn bind_store_clicks(router: &Router, container: &str) {
    let nav = router.clone();
    router.host().on_click(
        container,
        Rc::new(move |key: Option<String>| {
            if let Some(store_id) = key {
                nav.navigate_to(PageId::StoreDetails, NavParams::new().with("storeId", store_id));
            }
        }),
    );
}

fn render_list(host: &dyn Host, ranked: &[NearbyStore], term: &str) {
    let matches = filter_by_name(ranked, term);
    if matches.is_empty() {
        host.set_html(LIST_ID, &notice("text-slate-500", NO_MATCHES_TEXT));
    } else {
        host.set_html(LIST_ID, &render_cards(matches));
    }
}

fn product_row(product: &Product) -> String {
    let name = if product.name.trim().is_empty() { "Unnamed Service" } else { product.name.as_str() };
    format!(
        r#"<li class="flex justify-between items-center border-b border-slate-100 pb-3"><span class="text-slate-700">{}</span><span class="font-semibold text-slate-800">₹{} <span class="text-xs text-slate-500 font-normal">/pc</span></span></li>"#,
        escape(name),
        format_amount(product.price)
    )
}

#[derive(Default)]
pub struct StorePage {
    cache: RefCell<Option<Rc<Vec<Store>>>>,
}

impl StorePage {
    async fn cached_stores(&self, store: &dyn DocumentStore) -> Result<Rc<Vec<Store>>, StoreError> {
        if let Some(stores) = self.cache.borrow().clone() {
            log::debug!("using cached store list");
            return Ok(stores);
        }
        let stores = Rc::new(fetch_stores(store).await?);
        log::debug!("cached {} stores", stores.len());
        *self.cache.borrow_mut() = Some(stores.clone());
        Ok(stores)
    }

    async fn init_list(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        let Some(origin) = cx.app().coords() else {
            let wrote = host.set_html(LIST_ID, &notice("text-slate-500", WAITING_FOR_LOCATION_TEXT));
            return PageContext::require(wrote, LIST_ID);
        };
        PageContext::require(host.set_html(LIST_ID, &notice("text-slate-500", "Loading stores...")), LIST_ID)?;

        let stores = match self.cached_stores(cx.services().store.as_ref()).await {
            Ok(stores) => stores,
            Err(e) => {
                log::error!("fetching stores failed: {e}");
                if cx.is_current() {
                    host.set_html(LIST_ID, &notice("text-red-500 font-bold", "Error: Could not load stores."));
                }
                return Ok(());
            }
        };
        if !cx.is_current() {
            return Ok(());
        }

        let ranked = Rc::new(rank_by_distance(&stores, origin));
        render_list(host.as_ref(), &ranked, "");
        bind_store_clicks(&cx.router, LIST_ID);

        let search_host = host.clone();
        host.on_input(
            SEARCH_ID,
            Rc::new(move |term: String| render_list(search_host.as_ref(), &ranked, &term)),
        );
        Ok(())
    }

    async fn init_details(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        let Some(store_id) = cx.param("storeId") else {
            log::warn!("store details opened without a storeId");
            host.notify(MISSING_STORE_ID_TEXT);
            cx.router.navigate_to(PageId::Stores, NavParams::new());
            return Ok(());
        };
        PageContext::require(host.set_text(HOURS_ID, STORE_HOURS_TEXT), HOURS_ID)?;

        let store = cx.services().store.as_ref();
        let profile = store
            .get(collections::STORES, &store_id)
            .await
            .and_then(|doc| doc.map(|d| Store::from_document(&d)).transpose());
        match profile {
            Ok(Some(profile)) => {
                if !cx.is_current() {
                    return Ok(());
                }
                host.set_text(NAME_ID, profile.display_name());
                host.set_attribute(IMAGE_ID, "src", profile.cover_image.as_deref().unwrap_or(STORE_PLACEHOLDER_IMAGE));
                host.set_text(SHORT_ID, profile.short_description.as_deref().unwrap_or(DEFAULT_SERVICES_TEXT));
                host.set_text(RATING_ID, &profile.rating_label());
                let distance = match (cx.app().coords(), profile.location) {
                    (Some(origin), Some(point)) => distance_label(distance_km(origin, point.into())),
                    _ => "N/A".to_owned(),
                };
                host.set_text(DISTANCE_ID, &distance);
            }
            Ok(None) => {
                log::warn!("store {store_id} not found");
                if cx.is_current() {
                    host.notify(STORE_NOT_FOUND_TEXT);
                    cx.router.navigate_to(PageId::Stores, NavParams::new());
                }
                return Ok(());
            }
            Err(e) => {
                log::error!("fetching store {store_id} failed: {e}");
                if !cx.is_current() {
                    return Ok(());
                }
                host.set_text(NAME_ID, "Error loading store");
                host.set_disabled(PLACE_REQUEST_ID, true);
                host.set_text(PLACE_REQUEST_ID, "Cannot place request");
            }
        }

        let products = store
            .query(collections::PRODUCTS, &Query::new().where_eq("storeId", store_id.as_str()))
            .await;
        if !cx.is_current() {
            return Ok(());
        }
        match products {
            Ok(docs) if docs.is_empty() => {
                host.set_html(SERVICES_ID, &format!(r#"<li class="text-slate-500">{NO_SERVICES_TEXT}</li>"#));
            }
            Ok(docs) => {
                let rows: Vec<String> = docs
                    .iter()
                    .filter_map(|d| d.decode::<Product>().ok())
                    .map(|p| product_row(&p))
                    .collect();
                host.set_html(SERVICES_ID, &rows.join("\n"));
            }
            Err(e) => {
                log::error!("fetching products for {store_id} failed: {e}");
                host.set_html(SERVICES_ID, r#"<li class="text-red-500 font-bold">Error loading services.</li>"#);
            }
        }

        let router = cx.router.clone();
        host.on_click(
            PLACE_REQUEST_ID,
            Rc::new(move |_: Option<String>| {
                if router.app().is_signed_in() {
                    router.navigate_to(PageId::OrderRequest, NavParams::new().with("storeId", store_id.as_str()));
                } else {
                    router.host().notify(LOGIN_TO_REQUEST_TEXT);
                    router.navigate_to(PageId::Profile, NavParams::new());
                }
            }),
        );
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl PageBehavior for StorePage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        match cx.page {
            PageId::StoreDetails => self.init_details(cx).await,
            _ => self.init_list(cx).await,
        }
    }
}
