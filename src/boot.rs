//! Application startup: wires collaborators into the router and starts the
//! long-running listeners.
//!
//! SYSTEM CONTEXT
//! ==============
//! Called once by the shell (`app::App`) with browser collaborators, and by
//! tests with in-memory fakes. Startup order matters: the hash-change handler
//! and the auth subscription exist before the first page load, so neither a
//! fragment change nor the first auth transition can be missed.

#[cfg(test)]
#[path = "boot_test.rs"]
mod boot_test;

use std::rc::Rc;

use futures::channel::mpsc;

use crate::config::AppConfig;
use crate::host::Host;
use crate::net::identity::IdentityProvider;
use crate::net::location::{Geolocator, ReverseGeocoder};
use crate::net::store::DocumentStore;
use crate::net::template::TemplateLoader;
use crate::pages::{PageRegistry, Services};
use crate::router::{Router, RouterParts};
use crate::services::auth::run_auth_listener;
use crate::services::location::acquire_location;
use crate::state::app::AppState;
use crate::state::session_hint::{HintStorage, SessionHint};

/// Environment-specific collaborators.
pub struct Collaborators {
    pub host: Rc<dyn Host>,
    pub templates: Rc<dyn TemplateLoader>,
    pub hint_storage: Rc<dyn HintStorage>,
    pub store: Rc<dyn DocumentStore>,
    pub identity: Rc<dyn IdentityProvider>,
    pub geolocator: Rc<dyn Geolocator>,
    pub geocoder: Rc<dyn ReverseGeocoder>,
}

/// Build the router, start the auth listener and location acquisition, and
/// load the current fragment.
pub fn start(config: Rc<AppConfig>, parts: Collaborators) -> Router {
    let hint = SessionHint::new(parts.hint_storage, config.session_hint_key.clone());
    let router = Router::new(RouterParts {
        config,
        host: parts.host.clone(),
        templates: parts.templates,
        app: Rc::new(AppState::new(hint)),
        services: Services { store: parts.store, identity: parts.identity.clone() },
        pages: PageRegistry::standard(),
    });
    router.install();

    let (sink, transitions) = mpsc::unbounded();
    parts.identity.subscribe(sink);
    parts.host.spawn(Box::pin(run_auth_listener(router.clone(), transitions)));

    let (locating, geolocator, geocoder) = (router.clone(), parts.geolocator, parts.geocoder);
    parts.host.spawn(Box::pin(async move {
        acquire_location(locating, geolocator.as_ref(), geocoder.as_ref()).await;
    }));

    log::info!("drywash started at {:?}", parts.host.current_hash());
    router.reload();
    router
}
