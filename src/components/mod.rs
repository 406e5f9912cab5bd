//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the persistent shell around the routed content region
//! and read the chrome signal provided by `app::App`.

pub mod bottom_nav;
