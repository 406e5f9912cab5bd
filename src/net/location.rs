//! Device geolocation and reverse-geocoding seams.
//!
//! DESIGN
//! ======
//! Reverse geocoding never fails from the caller's point of view: every
//! outcome is folded into a display string by [`format_place`] so the
//! location status line always has something to show.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use serde::Deserialize;

use crate::state::location::Coords;

pub const ADDRESS_NOT_FOUND_TEXT: &str = "Detailed address not found.";
pub const ADDRESS_FORMAT_UNKNOWN_TEXT: &str = "Address format unknown.";
pub const ADDRESS_FETCH_FAILED_TEXT: &str = "Could not fetch address.";

/// Options forwarded to the platform geolocation API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self { high_accuracy: true, timeout_ms: 10_000, maximum_age_ms: 60_000 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("location permission denied")]
    Denied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("geolocation not supported")]
    Unsupported,
}

impl GeoError {
    /// Map a platform `GeolocationPositionError` code.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeoError::Denied,
            3 => GeoError::Timeout,
            _ => GeoError::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
pub trait Geolocator {
    async fn current_position(&self, options: &GeolocationOptions) -> Result<Coords, GeoError>;
}

#[async_trait::async_trait(?Send)]
pub trait ReverseGeocoder {
    /// Human-readable place for `coords`, or a fallback message.
    async fn place_name(&self, coords: Coords) -> String;
}

/// Reverse-geocoding response body (Nominatim `format=json`).
#[derive(Debug, Default, Deserialize)]
pub struct PlaceResponse {
    pub address: Option<PlaceAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
}

impl PlaceAddress {
    fn locality(&self) -> Option<&str> {
        [&self.city, &self.town, &self.village, &self.suburb]
            .into_iter()
            .find_map(|part| part.as_deref().filter(|s| !s.is_empty()))
    }
}

/// `"City, State"`, degrading to whichever half is present.
pub fn format_place(response: &PlaceResponse) -> String {
    let Some(address) = &response.address else {
        return ADDRESS_FORMAT_UNKNOWN_TEXT.to_owned();
    };
    let state = address.state.as_deref().filter(|s| !s.is_empty());
    match (address.locality(), state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (Some(city), None) => city.to_owned(),
        (None, Some(state)) => state.to_owned(),
        (None, None) => ADDRESS_NOT_FOUND_TEXT.to_owned(),
    }
}

#[cfg(any(test, feature = "csr"))]
fn reverse_geocode_url(base: &str, coords: Coords) -> String {
    format!("{base}?format=json&lat={}&lon={}", coords.lat, coords.lng)
}

/// Reverse geocoder backed by a Nominatim-compatible HTTP endpoint.
pub struct NominatimGeocoder {
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[async_trait::async_trait(?Send)]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, coords: Coords) -> String {
        #[cfg(feature = "csr")]
        {
            let url = reverse_geocode_url(&self.base_url, coords);
            let response = match gloo_net::http::Request::get(&url).send().await {
                Ok(resp) if resp.ok() => resp,
                Ok(resp) => {
                    log::warn!("reverse geocode failed: HTTP {}", resp.status());
                    return ADDRESS_FETCH_FAILED_TEXT.to_owned();
                }
                Err(e) => {
                    log::warn!("reverse geocode failed: {e}");
                    return ADDRESS_FETCH_FAILED_TEXT.to_owned();
                }
            };
            match response.json::<PlaceResponse>().await {
                Ok(body) => format_place(&body),
                Err(e) => {
                    log::warn!("reverse geocode body unreadable: {e}");
                    ADDRESS_FETCH_FAILED_TEXT.to_owned()
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.base_url, coords);
            ADDRESS_FETCH_FAILED_TEXT.to_owned()
        }
    }
}
