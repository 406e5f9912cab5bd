//! Auth gate for protected routes.
//!
//! The session hint lets a known-signed-out visitor be turned away at once;
//! otherwise the gate waits for the initial auth check and then trusts the
//! current user.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use super::routes::PageId;
use crate::config::AppConfig;
use crate::host::Host;
use crate::state::app::AppState;
use crate::util::html::WAITING_HTML;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect(PageId),
}

pub async fn check(app: &AppState, host: &dyn Host, config: &AppConfig) -> GateDecision {
    if app.session_hint().is_signed_out() {
        log::debug!("session hint is signed out; skipping auth wait");
        return GateDecision::Redirect(config.gate_fallback);
    }
    if !app.auth_check().is_resolved() {
        host.set_html(&config.content_mount_id, WAITING_HTML);
        app.auth_check().wait().await;
    }
    if app.is_signed_in() {
        GateDecision::Proceed
    } else {
        app.session_hint().write(false);
        GateDecision::Redirect(config.gate_fallback)
    }
}
