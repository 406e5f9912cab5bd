use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::state::auth::CurrentUser;
use crate::state::session_hint::{MemoryHintStorage, SessionHint};
use crate::test_support::FakeHost;

fn state() -> AppState {
    AppState::new(SessionHint::new(Rc::new(MemoryHintStorage::default()), "hint"))
}

fn host() -> FakeHost {
    FakeHost::new(futures::executor::LocalPool::new().spawner())
}

#[test]
fn signed_out_hint_redirects_without_waiting() {
    let app = state();
    app.session_hint().write(false);
    let host = host();
    let decision = block_on(check(&app, &host, &AppConfig::default()));
    assert_eq!(decision, GateDecision::Redirect(PageId::Profile));
    assert!(!app.auth_check().is_resolved());
    assert_eq!(app.auth_check().waiter_count(), 0);
    assert_eq!(host.html("page-content-wrapper"), "");
}

#[test]
fn resolved_without_user_redirects_and_records_hint() {
    let app = state();
    app.auth_check().resolve();
    let decision = block_on(check(&app, &host(), &AppConfig::default()));
    assert_eq!(decision, GateDecision::Redirect(PageId::Profile));
    assert!(app.session_hint().is_signed_out());
}

#[test]
fn resolved_with_user_proceeds() {
    let app = state();
    app.set_user(Some(CurrentUser { id: "u1".to_owned(), ..CurrentUser::default() }));
    app.auth_check().resolve();
    assert_eq!(block_on(check(&app, &host(), &AppConfig::default())), GateDecision::Proceed);
}

#[test]
fn redirect_target_follows_config() {
    let app = state();
    app.auth_check().resolve();
    let config = AppConfig { gate_fallback: PageId::Home, ..AppConfig::default() };
    assert_eq!(block_on(check(&app, &host(), &config)), GateDecision::Redirect(PageId::Home));
}
