//! Document-database seam used by the auth listener and page behaviours.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const STORES: &str = "store_profiles";
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const PICKUP_REQUESTS: &str = "pickup_requests";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("document store responded with status {0}")]
    Status(u16),
    #[error("not signed in")]
    Unauthenticated,
    #[error("malformed document: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// A stored document: its key plus plain-JSON fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self { id: id.into(), fields }
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the fields do not deserialize into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.fields.clone())?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters plus optional single-field ordering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Whether `fields` satisfies every equality filter.
    pub fn matches(&self, fields: &Value) -> bool {
        self.filters.iter().all(|(field, expected)| fields.get(field) == Some(expected))
    }
}

/// Document database operations the client relies on.
#[async_trait::async_trait(?Send)]
pub trait DocumentStore {
    /// Fetch one document; `Ok(None)` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or replace a document under a known id.
    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Create a document under a generated id and return that id.
    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}
