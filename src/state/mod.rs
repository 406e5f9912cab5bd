//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `location`, `session_hint`) and owned by
//! one [`app::AppState`] that is injected into the router and every page
//! behaviour instead of living in ambient globals. Writers are crate-private
//! so only the auth listener and the location acquisition mutate it.
//!
//! `chrome` is the exception: it is a Leptos signal owned by the shell and
//! written through the host when the router changes page.

pub mod app;
pub mod auth;
pub mod chrome;
pub mod location;
pub mod session_hint;
