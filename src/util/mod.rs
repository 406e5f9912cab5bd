//! Utility helpers shared across pages and collaborators.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure helpers (`distance`, `html`, `handler_slots`) compile everywhere. Browser
//! implementations of the collaborator seams are gated behind `csr` so the
//! rest of the crate stays testable natively.

pub mod distance;
pub mod handler_slots;
pub mod html;
pub mod persistence;

#[cfg(feature = "csr")]
pub mod dom_host;
#[cfg(feature = "csr")]
pub mod geolocation;
#[cfg(feature = "csr")]
pub mod session_storage;
