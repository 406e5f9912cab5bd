//! Client configuration read from the hosting page at startup.
//!
//! DESIGN
//! ======
//! Every field has a default so the client boots with no configuration at
//! all. The hosting page may override any subset through an inline JSON
//! element: `<script id="drywash-config" type="application/json">`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::net::location::GeolocationOptions;
use crate::router::routes::PageId;
use crate::state::location::Coords;

pub const CONFIG_ELEMENT_ID: &str = "drywash-config";
pub const DEFAULT_CONTENT_MOUNT_ID: &str = "page-content-wrapper";
pub const DEFAULT_TITLE_SUFFIX: &str = "Drywash";
pub const DEFAULT_TEMPLATE_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_SESSION_HINT_KEY: &str = "drywash.signed_in";
pub const DEFAULT_NEARBY_STORE_LIMIT: usize = 5;

/// Coordinate used when the device location is unavailable (New Delhi).
pub const FALLBACK_COORDS: Coords = Coords { lat: 28.6139, lng: 77.2090 };

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Firebase project credentials used by the REST identity and document clients.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
}

impl FirebaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Element id of the region page templates are injected into.
    pub content_mount_id: String,
    /// Appended to every route title: `"<title> - <suffix>"`.
    pub title_suffix: String,
    /// Where the auth gate sends users it refuses.
    pub gate_fallback: PageId,
    /// Where a sign-out while viewing a protected page lands.
    pub logout_redirect: PageId,
    pub fallback_location: Coords,
    pub geolocation: GeolocationOptions,
    pub template_timeout_ms: u32,
    pub reverse_geocode_url: String,
    pub session_hint_key: String,
    pub nearby_store_limit: usize,
    pub firebase: FirebaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_mount_id: DEFAULT_CONTENT_MOUNT_ID.to_owned(),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_owned(),
            gate_fallback: PageId::Profile,
            logout_redirect: PageId::Home,
            fallback_location: FALLBACK_COORDS,
            geolocation: GeolocationOptions::default(),
            template_timeout_ms: DEFAULT_TEMPLATE_TIMEOUT_MS,
            reverse_geocode_url: DEFAULT_REVERSE_GEOCODE_URL.to_owned(),
            session_hint_key: DEFAULT_SESSION_HINT_KEY.to_owned(),
            nearby_store_limit: DEFAULT_NEARBY_STORE_LIMIT,
            firebase: FirebaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a (possibly partial) JSON config; absent fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if `raw` is not valid config JSON.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Read the inline config element from the current document.
    ///
    /// Falls back to defaults when the element is absent or malformed.
    pub fn from_page() -> Self {
        #[cfg(feature = "csr")]
        {
            let raw = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
                .and_then(|el| el.text_content());
            let Some(raw) = raw else {
                log::info!("no #{CONFIG_ELEMENT_ID} element; using default config");
                return Self::default();
            };
            match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("{e}; using default config");
                    Self::default()
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Self::default()
        }
    }

    /// Document title for a route: `"Home - Drywash"`.
    pub fn page_title(&self, route_title: &str) -> String {
        format!("{route_title} - {}", self.title_suffix)
    }
}
