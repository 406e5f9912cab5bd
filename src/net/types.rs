//! Document records decoded by page behaviours.
//!
//! DESIGN
//! ======
//! Field names follow the stored documents (camelCase). Document ids are not
//! stored fields; `from_document` constructors fill them in after decoding.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::store::{Document, StoreError};
use crate::state::location::Coords;

/// Stored timestamp: epoch millis written by this client, or RFC 3339 text
/// written by other tools.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Rfc3339(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            Timestamp::Millis(ms) => {
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(*ms) * 1_000_000).ok()
            }
            Timestamp::Rfc3339(text) => OffsetDateTime::parse(text, &Rfc3339).ok(),
        }
    }

    /// Calendar date (`YYYY-MM-DD`, UTC).
    pub fn date_label(&self) -> Option<String> {
        self.to_datetime().map(|dt| dt.date().to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coords> for GeoPoint {
    fn from(c: Coords) -> Self {
        Self { latitude: c.lat, longitude: c.lng }
    }
}

impl From<GeoPoint> for Coords {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.latitude, lng: p.longitude }
    }
}

/// A `store_profiles` document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Store {
    #[serde(skip)]
    pub id: String,
    pub name: Option<String>,
    pub cover_image: Option<String>,
    pub short_description: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<GeoPoint>,
}

impl Store {
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the document does not match the shape.
    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let mut store: Self = doc.decode()?;
        store.id.clone_from(&doc.id);
        Ok(store)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Store")
    }

    /// Rating with one decimal, or `"N/A"`.
    pub fn rating_label(&self) -> String {
        self.rating.map_or_else(|| "N/A".to_owned(), |r| format!("{r:.1}"))
    }
}

/// A `products` document (one priced service of a store).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub store_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// An `orders` document, created by the store once a pickup is priced.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    #[serde(skip)]
    pub id: String,
    pub customer_id: String,
    pub status: Option<String>,
    pub total: Option<f64>,
    pub items: Vec<OrderItem>,
    pub created_at: Option<Timestamp>,
    pub rating: Option<u8>,
    pub rating_given: bool,
}

pub const STATUS_DELIVERED: &str = "DELIVERED";

impl Order {
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the document does not match the shape.
    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let mut order: Self = doc.decode()?;
        order.id.clone_from(&doc.id);
        Ok(order)
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("N/A")
    }

    pub fn can_rate(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DELIVERED) && !self.rating_given
    }

    /// First six characters of the id, as shown on order cards.
    pub fn short_id(&self) -> &str {
        let end = self.id.char_indices().nth(6).map_or(self.id.len(), |(i, _)| i);
        &self.id[..end]
    }
}

pub const PICKUP_STATUS_PENDING: &str = "Pending";

/// A `pickup_requests` document written by the order-request page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub store_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub customer_address: String,
    pub customer_location: GeoPoint,
    pub pickup_slot: String,
    pub notes: String,
    pub status: String,
    pub created_at: i64,
}

/// Rupee amount without trailing zeros for whole values: `120`, `45.50`.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 { format!("{amount:.0}") } else { format!("{amount:.2}") }
}
