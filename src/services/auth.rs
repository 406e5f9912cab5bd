//! Auth state listener.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider pushes transitions into a channel; one task drains
//! it in arrival order, so a sign-out can never be overtaken by the profile
//! fetch of an earlier sign-in.
//!
//! ERROR HANDLING
//! ==============
//! Any failure to read or create the user document is treated as signed out
//! (fail closed) and logged.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;

use crate::net::identity::{AuthIdentity, AuthTransition};
use crate::net::store::{DocumentStore, StoreError, collections};
use crate::router::Router;
use crate::router::hash::NavParams;
use crate::router::routes::PageId;
use crate::state::auth::CurrentUser;

/// Process transitions until the provider drops its sender.
pub async fn run_auth_listener(router: Router, mut transitions: UnboundedReceiver<AuthTransition>) {
    while let Some(transition) = transitions.next().await {
        apply_transition(&router, transition).await;
    }
    log::debug!("auth transition stream closed");
}

/// Apply one authentication transition to application state and routing.
pub async fn apply_transition(router: &Router, transition: AuthTransition) {
    let user = match transition {
        Some(identity) => {
            let now_ms = router.host().now_ms();
            match resolve_profile(router.services().store.as_ref(), &identity, now_ms).await {
                Ok(user) => Some(user),
                Err(e) => {
                    log::error!("loading profile for {} failed; treating as signed out: {e}", identity.uid);
                    None
                }
            }
        }
        None => None,
    };
    let signed_in = user.is_some();
    log::info!("auth transition: {}", if signed_in { "signed in" } else { "signed out" });

    let app = router.app();
    let previous = app.set_user(user.clone());
    if app.auth_check().resolve() {
        log::debug!("initial auth check resolved");
    }
    app.session_hint().write(signed_in);

    let active = router.active_route();
    // The gate handles a first transition that arrives signed out.
    if !signed_in && previous.is_some() && active.protected {
        let target = router.config().logout_redirect;
        log::info!("signed out on #{}; redirecting to #{}", active.page.as_str(), target.as_str());
        router.navigate_to(target, NavParams::new());
    } else if active.page == PageId::Profile && previous != user {
        router.reload();
    }
}

/// Fetch `users/{uid}`, creating the default document on first sign-in.
///
/// # Errors
///
/// Returns the store error if the read, the decode or the create fails.
pub async fn resolve_profile(
    store: &dyn DocumentStore,
    identity: &AuthIdentity,
    now_ms: i64,
) -> Result<CurrentUser, StoreError> {
    if let Some(doc) = store.get(collections::USERS, &identity.uid).await? {
        let mut user: CurrentUser = doc.decode()?;
        user.id.clone_from(&identity.uid);
        return Ok(user);
    }
    let user = CurrentUser::new_default(identity, now_ms);
    store.set(collections::USERS, &identity.uid, serde_json::to_value(&user)?).await?;
    log::info!("created profile document for {}", identity.uid);
    Ok(user)
}
