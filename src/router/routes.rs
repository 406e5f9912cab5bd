//! Static route table.
//!
//! DESIGN
//! ======
//! Routes are fixed at compile time and indexed by [`PageId`]; behaviours are
//! referenced by a [`Behavior`] key resolved through the page registry rather
//! than by script path, so a route can never name a module that fails to load.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use serde::Deserialize;

/// Navigable page identifiers, as they appear in the URL fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    Home,
    Stores,
    StoreDetails,
    OrderHistory,
    Profile,
    OrderRequest,
    ManageAddresses,
    Help,
}

impl PageId {
    pub const ALL: [PageId; 8] = [
        PageId::Home,
        PageId::Stores,
        PageId::StoreDetails,
        PageId::OrderHistory,
        PageId::Profile,
        PageId::OrderRequest,
        PageId::ManageAddresses,
        PageId::Help,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::Stores => "stores",
            PageId::StoreDetails => "store-details",
            PageId::OrderHistory => "order-history",
            PageId::Profile => "profile",
            PageId::OrderRequest => "order-request",
            PageId::ManageAddresses => "manage-addresses",
            PageId::Help => "help",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == key)
    }

    pub fn route(self) -> &'static Route {
        &ROUTES[self as usize]
    }
}

/// Page behaviour keys. `stores` and `store-details` share one behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    Home,
    Store,
    OrderHistory,
    Profile,
    OrderRequest,
    ManageAddresses,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub page: PageId,
    /// Template location fetched over HTTP, relative to the app root.
    pub template: &'static str,
    pub title: &'static str,
    pub behavior: Option<Behavior>,
    /// Protected routes render only for a resolved, present user.
    pub protected: bool,
}

/// Indexed by `PageId as usize`.
pub const ROUTES: [Route; 8] = [
    Route {
        page: PageId::Home,
        template: "pages/home.html",
        title: "Home",
        behavior: Some(Behavior::Home),
        protected: false,
    },
    Route {
        page: PageId::Stores,
        template: "pages/stores.html",
        title: "Stores",
        behavior: Some(Behavior::Store),
        protected: false,
    },
    Route {
        page: PageId::StoreDetails,
        template: "pages/store-details.html",
        title: "Store Details",
        behavior: Some(Behavior::Store),
        protected: false,
    },
    Route {
        page: PageId::OrderHistory,
        template: "pages/order-history.html",
        title: "My Orders",
        behavior: Some(Behavior::OrderHistory),
        protected: true,
    },
    Route {
        page: PageId::Profile,
        template: "pages/profile.html",
        title: "My Account",
        behavior: Some(Behavior::Profile),
        protected: false,
    },
    Route {
        page: PageId::OrderRequest,
        template: "pages/order-request.html",
        title: "Place Request",
        behavior: Some(Behavior::OrderRequest),
        protected: true,
    },
    Route {
        page: PageId::ManageAddresses,
        template: "pages/manage-addresses.html",
        title: "My Addresses",
        behavior: Some(Behavior::ManageAddresses),
        protected: true,
    },
    Route {
        page: PageId::Help,
        template: "pages/help.html",
        title: "Help",
        behavior: None,
        protected: false,
    },
];

/// Resolve a route key; unknown or empty keys degrade to `home`.
pub fn resolve(route_key: &str) -> &'static Route {
    PageId::parse(route_key).unwrap_or(PageId::Home).route()
}
