//! Long-running tasks started at boot.
//!
//! `auth` consumes identity transitions and owns the current user; `location`
//! acquires the device position once and owns the location fix.

pub mod auth;
pub mod location;
