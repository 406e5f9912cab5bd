//! Page behaviours: per-route logic run after a template is injected.
//!
//! SYSTEM CONTEXT
//! ==============
//! The router resolves a route's [`Behavior`] key through the
//! [`PageRegistry`] and calls [`PageBehavior::init`] with a [`PageContext`].
//! Behaviours bind handlers to element ids in their template and reach
//! collaborators only through the context.
//!
//! ERROR HANDLING
//! ==============
//! Expected conditions (signed out, empty lists, invalid parameters) are
//! handled inside the behaviour with notices or inline messages. Returning
//! `Err` makes the router replace the page with an error panel.

pub mod home;
pub mod manage_addresses;
pub mod order_history;
pub mod order_request;
pub mod profile;
pub mod store;

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::host::Host;
use crate::net::identity::{IdentityError, IdentityProvider};
use crate::net::store::{DocumentStore, StoreError};
use crate::router::Router;
use crate::router::hash::{NavParams, NavigationState};
use crate::router::routes::{Behavior, PageId};
use crate::state::app::AppState;
use crate::state::auth::CurrentUser;

/// Data collaborators available to behaviours.
#[derive(Clone)]
pub struct Services {
    pub store: Rc<dyn DocumentStore>,
    pub identity: Rc<dyn IdentityProvider>,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Missing page element #{0}")]
    MissingElement(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Everything a behaviour receives for one page load.
pub struct PageContext {
    /// Full fragment that triggered the load, including any query.
    pub hash: String,
    pub page: PageId,
    /// Params stored by the most recent `navigate_to`.
    pub params: NavParams,
    /// User at the time the load started.
    pub user: Option<CurrentUser>,
    pub router: Router,
    pub(crate) generation: u64,
}

impl PageContext {
    pub fn host(&self) -> &Rc<dyn Host> {
        self.router.host()
    }

    pub fn app(&self) -> &Rc<AppState> {
        self.router.app()
    }

    pub fn services(&self) -> &Services {
        self.router.services()
    }

    pub fn config(&self) -> &AppConfig {
        self.router.config()
    }

    /// Non-empty parameter from the fragment query, falling back to the
    /// stored navigation params. The fragment wins so reloads keep working.
    pub fn param(&self, key: &str) -> Option<String> {
        let nav = NavigationState::parse(&self.hash);
        nav.params
            .non_empty(key)
            .or_else(|| self.params.non_empty(key))
            .map(str::to_owned)
    }

    /// False once a newer page load has started.
    pub fn is_current(&self) -> bool {
        self.router.is_current(self.generation)
    }

    /// Fail with [`PageError::MissingElement`] unless `wrote` is true.
    pub fn require(wrote: bool, id: &str) -> Result<(), PageError> {
        if wrote { Ok(()) } else { Err(PageError::MissingElement(id.to_owned())) }
    }
}

#[async_trait::async_trait(?Send)]
pub trait PageBehavior {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError>;
}

/// Static behaviour table keyed by [`Behavior`].
#[derive(Default)]
pub struct PageRegistry {
    entries: HashMap<Behavior, Rc<dyn PageBehavior>>,
}

impl PageRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every behaviour the route table references.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Behavior::Home, Rc::new(home::HomePage));
        registry.register(Behavior::Store, Rc::new(store::StorePage::default()));
        registry.register(Behavior::OrderHistory, Rc::new(order_history::OrderHistoryPage::default()));
        registry.register(Behavior::Profile, Rc::new(profile::ProfilePage::default()));
        registry.register(Behavior::OrderRequest, Rc::new(order_request::OrderRequestPage));
        registry.register(Behavior::ManageAddresses, Rc::new(manage_addresses::ManageAddressesPage));
        registry
    }

    pub fn register(&mut self, key: Behavior, behavior: Rc<dyn PageBehavior>) {
        self.entries.insert(key, behavior);
    }

    pub fn get(&self, key: Behavior) -> Option<Rc<dyn PageBehavior>> {
        self.entries.get(&key).cloned()
    }
}
