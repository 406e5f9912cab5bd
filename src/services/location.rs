//! One-shot device location acquisition at startup.
//!
//! Runs independently of routing. Every outcome leaves a coordinate in
//! `AppState` (the configured fallback when the device gives none) and a
//! status line, and reloads the active route when it shows distances.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use crate::net::location::{GeoError, Geolocator, ReverseGeocoder};
use crate::router::Router;
use crate::router::routes::PageId;

pub const FETCHING_LOCATION_TEXT: &str = "Fetching location...";
pub const FETCHING_ADDRESS_TEXT: &str = "Fetching address...";
pub const LOCATION_DENIED_TEXT: &str = "Location access denied.";
pub const LOCATION_UNSUPPORTED_TEXT: &str = "Geolocation not supported.";

/// Element showing the location status, present on pages with a header.
pub const LOCATION_TEXT_ID: &str = "current-location-text";

fn show_status(router: &Router, text: &str) {
    router.app().set_location_status(text);
    router.host().set_text(LOCATION_TEXT_ID, text);
}

pub async fn acquire_location(router: Router, geolocator: &dyn Geolocator, geocoder: &dyn ReverseGeocoder) {
    show_status(&router, FETCHING_LOCATION_TEXT);
    match geolocator.current_position(&router.config().geolocation).await {
        Ok(coords) => {
            log::info!("device location acquired");
            router.app().set_location(Some(coords), FETCHING_ADDRESS_TEXT);
            router.host().set_text(LOCATION_TEXT_ID, FETCHING_ADDRESS_TEXT);
            let place = geocoder.place_name(coords).await;
            show_status(&router, &place);
        }
        Err(e) => {
            log::warn!("device location unavailable ({e}); using fallback");
            let text = match e {
                GeoError::Unsupported => LOCATION_UNSUPPORTED_TEXT,
                GeoError::Denied | GeoError::Unavailable | GeoError::Timeout => LOCATION_DENIED_TEXT,
            };
            router.app().set_location(Some(router.config().fallback_location), text);
            router.host().set_text(LOCATION_TEXT_ID, text);
        }
    }
    if matches!(router.active_route().page, PageId::Home | PageId::Stores) {
        router.reload();
    }
}
