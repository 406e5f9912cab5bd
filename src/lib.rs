//! # drywash
//!
//! Leptos + WASM client for the Drywash laundry pickup service.
//!
//! The crate is organised around a hash router (`router`) that gates
//! protected pages on the initial authentication check, injects page
//! templates into the content region, and hands control to per-route page
//! behaviours (`pages`). Shared application state lives in `state`,
//! long-running listeners (auth transitions, geolocation) in `services`,
//! collaborator seams and their browser implementations in `net` and `util`.
//!
//! Everything except the browser glue compiles natively so the routing and
//! gating logic is tested without a browser; the glue is gated behind the
//! `csr` feature.

pub mod app;
pub mod boot;
pub mod components;
pub mod config;
pub mod host;
pub mod net;
pub mod pages;
pub mod router;
pub mod services;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

/// WASM entry point: installs panic/log hooks and mounts the shell.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
