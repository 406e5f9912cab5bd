//! Collaborator seams and their browser implementations.
//!
//! SYSTEM CONTEXT
//! ==============
//! `template` loads page templates, `store` and `identity` front the
//! document database and identity provider, `location` covers geolocation
//! and reverse geocoding, and `types` holds the document records pages
//! decode. `firebase` and `firestore_value` implement the store and identity
//! seams over the Firebase REST APIs.

pub mod firebase;
#[cfg(any(test, feature = "csr"))]
pub mod firestore_value;
pub mod identity;
pub mod location;
pub mod store;
pub mod template;
pub mod types;
