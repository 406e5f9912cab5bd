//! Application shell: document title, routed content region and bottom nav.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos renders only the persistent chrome. The routed content region is an
//! empty mount that the router fills with page templates, so once the shell is
//! in the document the browser collaborators are built and the router boots.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::bottom_nav::BottomNav;
use crate::config::AppConfig;
use crate::state::chrome::ChromeState;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let chrome = RwSignal::new(ChromeState::default());
    provide_context(chrome);

    let config = Rc::new(AppConfig::from_page());
    let mount_id = config.content_mount_id.clone();

    #[cfg(feature = "csr")]
    Effect::new(move |booted: Option<()>| {
        if booted.is_none() {
            untrack(|| boot_browser(Rc::clone(&config), chrome));
        }
    });
    #[cfg(not(feature = "csr"))]
    let _ = config;

    let title = move || chrome.with(|c| c.title.clone());

    view! {
        <Title text=title />
        <main id=mount_id class="page-content"></main>
        <BottomNav />
    }
}

#[cfg(feature = "csr")]
fn boot_browser(config: Rc<AppConfig>, chrome: RwSignal<ChromeState>) {
    use crate::boot::{self, Collaborators};
    use crate::net::firebase::{FirebaseAuth, Firestore};
    use crate::net::location::NominatimGeocoder;
    use crate::net::template::HttpTemplateLoader;
    use crate::state::session_hint::{HintStorage, MemoryHintStorage};
    use crate::util::dom_host::DomHost;
    use crate::util::geolocation::BrowserGeolocator;
    use crate::util::session_storage::BrowserSessionStorage;

    if !config.firebase.is_configured() {
        log::warn!("firebase is not configured; sign-in and store data will fail");
    }
    let hint_storage: Rc<dyn HintStorage> = match BrowserSessionStorage::open() {
        Some(storage) => Rc::new(storage),
        None => {
            log::warn!("session storage unavailable; login hint kept in memory");
            Rc::new(MemoryHintStorage::default())
        }
    };
    let auth = FirebaseAuth::new(config.firebase.clone());
    let parts = Collaborators {
        host: Rc::new(DomHost::new(chrome)),
        templates: Rc::new(HttpTemplateLoader::new(config.template_timeout_ms)),
        hint_storage,
        store: Rc::new(Firestore::new(&config.firebase, auth.clone())),
        identity: Rc::new(auth),
        geolocator: Rc::new(BrowserGeolocator),
        geocoder: Rc::new(NominatimGeocoder::new(config.reverse_geocode_url.clone())),
    };
    // The router stays alive through the hash-change handler it installs.
    let _router = boot::start(config, parts);
}
