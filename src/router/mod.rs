//! Hash router: resolves the fragment to a route, gates protected routes,
//! injects the page template and runs the page behaviour.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation (tab clicks, `navigate_to`, back/forward, manual fragment
//! edits, the initial load, and reloads requested by the auth listener or the
//! location acquisition) funnels through [`Router::load_page`].
//!
//! DESIGN
//! ======
//! Loads are not serialised. Each load takes a generation number and, after
//! every suspension point, stops without touching the content region if a
//! newer load has started since. Outcomes are returned as [`LoadOutcome`] so
//! tests can assert on them; production callers ignore them.
//!
//! ERROR HANDLING
//! ==============
//! Template and behaviour failures are rendered as inline error panels and
//! logged. The only condition that halts rendering is a missing content mount.

pub mod gate;
pub mod hash;
pub mod routes;


use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::AppConfig;
use crate::host::Host;
use crate::net::template::TemplateLoader;
use crate::pages::{PageContext, PageRegistry, Services};
use crate::state::app::AppState;
use crate::util::html::{LOADING_HTML, error_panel};
use gate::GateDecision;
use hash::{NavParams, NavigationState, build_hash, route_key};
use routes::{PageId, Route};

/// Result of one page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Template injected and behaviour (if any) initialised.
    Rendered(PageId),
    /// The auth gate refused the route and navigation moved elsewhere.
    Redirected { from: PageId, to: PageId },
    /// An error panel replaced the page.
    Failed { page: PageId, message: String },
    /// A newer load started before this one finished.
    Superseded(PageId),
    /// The content mount is missing; nothing was rendered.
    Halted,
}

/// Collaborators the router is built from.
pub struct RouterParts {
    pub config: Rc<AppConfig>,
    pub host: Rc<dyn Host>,
    pub templates: Rc<dyn TemplateLoader>,
    pub app: Rc<AppState>,
    pub services: Services,
    pub pages: PageRegistry,
}

struct RouterInner {
    config: Rc<AppConfig>,
    host: Rc<dyn Host>,
    templates: Rc<dyn TemplateLoader>,
    app: Rc<AppState>,
    services: Services,
    pages: PageRegistry,
    /// Params from the most recent `navigate_to`, handed to the next behaviour.
    pending_params: RefCell<NavParams>,
    generation: Cell<u64>,
}

#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    pub fn new(parts: RouterParts) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                config: parts.config,
                host: parts.host,
                templates: parts.templates,
                app: parts.app,
                services: parts.services,
                pages: parts.pages,
                pending_params: RefCell::new(NavParams::new()),
                generation: Cell::new(0),
            }),
        }
    }

    /// Route every fragment change through [`Router::load_page`].
    pub fn install(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.host.on_hash_change(Rc::new(move |hash| {
            if let Some(inner) = weak.upgrade() {
                Router { inner }.spawn_load(hash);
            }
        }));
    }

    pub fn app(&self) -> &Rc<AppState> {
        &self.inner.app
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.inner.host
    }

    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Route resolved from the current fragment.
    pub fn active_route(&self) -> &'static Route {
        routes::resolve(route_key(&self.inner.host.current_hash()))
    }

    /// Number of loads started so far.
    pub fn loads_started(&self) -> u64 {
        self.inner.generation.get()
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.get() == generation
    }

    /// Navigate to `page`, carrying `params` to its behaviour.
    ///
    /// A different fragment is written to the host (which then reports the
    /// change); re-navigating to the current fragment loads it directly.
    pub fn navigate_to(&self, page: PageId, params: NavParams) {
        let hash = build_hash(page, &params);
        *self.inner.pending_params.borrow_mut() = params;
        if hash == self.inner.host.current_hash() {
            self.spawn_load(hash);
        } else {
            self.inner.host.set_hash(&hash);
        }
    }

    /// Load the current fragment again.
    pub fn reload(&self) {
        self.spawn_load(self.inner.host.current_hash());
    }

    fn spawn_load(&self, hash: String) {
        let router = self.clone();
        self.inner.host.spawn(Box::pin(async move {
            router.load_page(&hash).await;
        }));
    }

    pub async fn load_page(&self, hash: &str) -> LoadOutcome {
        let inner = &self.inner;
        let generation = inner.generation.get() + 1;
        inner.generation.set(generation);

        let nav = NavigationState::parse(hash);
        let route = routes::resolve(&nav.route_key);
        let page = route.page;
        log::debug!("load #{} (generation {generation})", page.as_str());

        if route.protected {
            let decision = gate::check(&inner.app, inner.host.as_ref(), &inner.config).await;
            if !self.is_current(generation) {
                return LoadOutcome::Superseded(page);
            }
            if let GateDecision::Redirect(to) = decision {
                log::info!("#{} requires sign-in; redirecting to #{}", page.as_str(), to.as_str());
                self.navigate_to(to, NavParams::new());
                return LoadOutcome::Redirected { from: page, to };
            }
        }

        let mount = inner.config.content_mount_id.as_str();
        if !inner.host.set_html(mount, LOADING_HTML) {
            log::error!("content mount #{mount} not found; page rendering halted");
            return LoadOutcome::Halted;
        }
        inner.host.set_active_tab(page);
        inner.host.set_title(&inner.config.page_title(route.title));

        let template = inner.templates.fetch(route.template).await;
        if !self.is_current(generation) {
            return LoadOutcome::Superseded(page);
        }
        let html = match template {
            Ok(html) => html,
            Err(e) => {
                log::error!("error loading page #{}: {e}", page.as_str());
                let message = e.to_string();
                inner.host.set_html(mount, &error_panel(&message));
                return LoadOutcome::Failed { page, message };
            }
        };
        if !inner.host.set_html(mount, &html) {
            log::error!("content mount #{mount} disappeared while loading");
            return LoadOutcome::Halted;
        }

        let Some(behavior) = route.behavior else {
            return LoadOutcome::Rendered(page);
        };
        let Some(handler) = inner.pages.get(behavior) else {
            log::warn!("no behaviour registered for {behavior:?}; #{} left static", page.as_str());
            return LoadOutcome::Rendered(page);
        };
        let cx = PageContext {
            hash: hash.to_owned(),
            page,
            params: inner.pending_params.borrow().clone(),
            user: inner.app.current_user(),
            router: self.clone(),
            generation,
        };
        match handler.init(&cx).await {
            Ok(()) => LoadOutcome::Rendered(page),
            Err(_) if !self.is_current(generation) => LoadOutcome::Superseded(page),
            Err(e) => {
                log::error!("page behaviour for #{} failed: {e}", page.as_str());
                let message = e.to_string();
                inner.host.set_html(mount, &error_panel(&message));
                LoadOutcome::Failed { page, message }
            }
        }
    }
}
