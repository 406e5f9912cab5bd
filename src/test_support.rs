//! In-memory collaborators for native tests.
//!
//! `FakeHost` auto-creates any element it is asked to write to unless the id
//! was marked missing, so tests only declare the absences they care about.
//! Spawned tasks run on a `LocalPool` driven by [`TestApp::run`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use serde_json::Value;

use crate::boot::{self, Collaborators};
use crate::config::AppConfig;
use crate::host::{ClickHandler, HashHandler, Host, InputHandler, SubmitHandler, Task};
use crate::net::identity::{AuthIdentity, AuthTransition, IdentityError, IdentityProvider};
use crate::net::location::{GeoError, GeolocationOptions, Geolocator, ReverseGeocoder};
use crate::net::store::{Direction, Document, DocumentStore, Query, StoreError};
use crate::net::template::{LoadError, TemplateLoader};
use crate::pages::{PageRegistry, Services};
use crate::router::routes::PageId;
use crate::router::{Router, RouterParts};
use crate::state::app::AppState;
use crate::state::location::Coords;
use crate::state::session_hint::{MemoryHintStorage, SessionHint};

// =============================================================
// Host
// =============================================================

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeElement {
    pub html: String,
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub hidden: bool,
    pub disabled: bool,
    pub value: String,
}

pub(crate) struct FakeHost {
    hash: RefCell<String>,
    title: RefCell<String>,
    active_tab: Cell<Option<PageId>>,
    elements: RefCell<HashMap<String, FakeElement>>,
    missing: RefCell<HashSet<String>>,
    notices: RefCell<Vec<String>>,
    hash_handler: RefCell<Option<HashHandler>>,
    clicks: RefCell<HashMap<String, ClickHandler>>,
    submits: RefCell<HashMap<String, SubmitHandler>>,
    inputs: RefCell<HashMap<String, InputHandler>>,
    spawner: LocalSpawner,
    now: Cell<i64>,
}

impl FakeHost {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            hash: RefCell::new(String::new()),
            title: RefCell::new(String::new()),
            active_tab: Cell::new(None),
            elements: RefCell::new(HashMap::new()),
            missing: RefCell::new(HashSet::new()),
            notices: RefCell::new(Vec::new()),
            hash_handler: RefCell::new(None),
            clicks: RefCell::new(HashMap::new()),
            submits: RefCell::new(HashMap::new()),
            inputs: RefCell::new(HashMap::new()),
            spawner,
            now: Cell::new(1_714_521_600_000),
        }
    }

    /// Set the fragment without firing the hash-change handler.
    pub fn put_hash(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_owned();
    }

    pub fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn active_tab(&self) -> Option<PageId> {
        self.active_tab.get()
    }

    pub fn mark_missing(&self, id: &str) {
        self.missing.borrow_mut().insert(id.to_owned());
        self.elements.borrow_mut().remove(id);
    }

    pub fn element(&self, id: &str) -> Option<FakeElement> {
        self.elements.borrow().get(id).cloned()
    }

    pub fn html(&self, id: &str) -> String {
        self.element(id).map(|e| e.html).unwrap_or_default()
    }

    pub fn text(&self, id: &str) -> String {
        self.element(id).map(|e| e.text).unwrap_or_default()
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.element(id).is_some_and(|e| e.hidden)
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.element(id).is_some_and(|e| e.disabled)
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.element(id).and_then(|e| e.attributes.get(name).cloned())
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    /// Simulate typing into an input without firing its handler.
    pub fn type_value(&self, id: &str, value: &str) {
        self.with_element(id, |e| e.value = value.to_owned());
    }

    pub fn click(&self, id: &str, key: Option<&str>) {
        let handler = self.clicks.borrow().get(id).cloned();
        if let Some(handler) = handler {
            handler(key.map(str::to_owned));
        }
    }

    pub fn has_click_handler(&self, id: &str) -> bool {
        self.clicks.borrow().contains_key(id)
    }

    pub fn submit(&self, id: &str) {
        let handler = self.submits.borrow().get(id).cloned();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn input(&self, id: &str, value: &str) {
        self.type_value(id, value);
        let handler = self.inputs.borrow().get(id).cloned();
        if let Some(handler) = handler {
            handler(value.to_owned());
        }
    }

    fn with_element(&self, id: &str, f: impl FnOnce(&mut FakeElement)) -> bool {
        if self.missing.borrow().contains(id) {
            return false;
        }
        f(self.elements.borrow_mut().entry(id.to_owned()).or_default());
        true
    }

    fn exists(&self, id: &str) -> bool {
        !self.missing.borrow().contains(id)
    }
}

impl Host for FakeHost {
    fn current_hash(&self) -> String {
        self.hash()
    }

    fn set_hash(&self, hash: &str) {
        if self.hash() == hash {
            return;
        }
        self.put_hash(hash);
        let handler = self.hash_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(hash.to_owned());
        }
    }

    fn on_hash_change(&self, handler: HashHandler) {
        *self.hash_handler.borrow_mut() = Some(handler);
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_owned();
    }

    fn set_active_tab(&self, page: PageId) {
        self.active_tab.set(Some(page));
    }

    fn set_html(&self, id: &str, html: &str) -> bool {
        self.with_element(id, |e| e.html = html.to_owned())
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        self.with_element(id, |e| e.text = text.to_owned())
    }

    fn set_attribute(&self, id: &str, name: &str, value: &str) -> bool {
        self.with_element(id, |e| {
            e.attributes.insert(name.to_owned(), value.to_owned());
        })
    }

    fn set_hidden(&self, id: &str, hidden: bool) -> bool {
        self.with_element(id, |e| e.hidden = hidden)
    }

    fn set_disabled(&self, id: &str, disabled: bool) -> bool {
        self.with_element(id, |e| e.disabled = disabled)
    }

    fn input_value(&self, id: &str) -> Option<String> {
        if !self.exists(id) {
            return None;
        }
        Some(self.element(id).map(|e| e.value).unwrap_or_default())
    }

    fn set_input_value(&self, id: &str, value: &str) -> bool {
        self.with_element(id, |e| e.value = value.to_owned())
    }

    fn on_click(&self, id: &str, handler: ClickHandler) -> bool {
        if !self.exists(id) {
            return false;
        }
        self.clicks.borrow_mut().insert(id.to_owned(), handler);
        true
    }

    fn on_submit(&self, id: &str, handler: SubmitHandler) -> bool {
        if !self.exists(id) {
            return false;
        }
        self.submits.borrow_mut().insert(id.to_owned(), handler);
        true
    }

    fn on_input(&self, id: &str, handler: InputHandler) -> bool {
        if !self.exists(id) {
            return false;
        }
        self.inputs.borrow_mut().insert(id.to_owned(), handler);
        true
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_owned());
    }

    fn spawn(&self, task: Task) {
        if let Err(e) = self.spawner.spawn_local(task) {
            panic!("spawn failed: {e}");
        }
    }

    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

// =============================================================
// Templates
// =============================================================

#[derive(Default)]
pub(crate) struct FakeTemplates {
    failures: RefCell<HashMap<String, LoadError>>,
    holds: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    fetched: RefCell<Vec<String>>,
}

impl FakeTemplates {
    pub fn fail(&self, location: &str, error: LoadError) {
        self.failures.borrow_mut().insert(location.to_owned(), error);
    }

    /// Make the next fetch of `location` wait until the sender fires.
    pub fn hold(&self, location: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds.borrow_mut().insert(location.to_owned(), rx);
        tx
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn fetch_count(&self, location: &str) -> usize {
        self.fetched.borrow().iter().filter(|l| *l == location).count()
    }
}

#[async_trait::async_trait(?Send)]
impl TemplateLoader for FakeTemplates {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        self.fetched.borrow_mut().push(location.to_owned());
        let hold = self.holds.borrow_mut().remove(location);
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        if let Some(error) = self.failures.borrow().get(location) {
            return Err(error.clone());
        }
        Ok(format!("<section data-template=\"{location}\"></section>"))
    }
}

// =============================================================
// Document store
// =============================================================

#[derive(Default)]
pub(crate) struct MemoryStore {
    collections: RefCell<BTreeMap<String, BTreeMap<String, Value>>>,
    failing: Cell<bool>,
    next_id: Cell<u64>,
}

impl MemoryStore {
    pub fn insert(&self, collection: &str, id: &str, fields: Value) {
        self.collections
            .borrow_mut()
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), fields);
    }

    pub fn doc(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.borrow().get(collection).and_then(|c| c.get(id)).cloned()
    }

    pub fn all(&self, collection: &str) -> Vec<(String, Value)> {
        self.collections
            .borrow()
            .get(collection)
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.get() { Err(StoreError::Status(503)) } else { Ok(()) }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => {
            let text = |v: Option<&Value>| v.map(ToString::to_string).unwrap_or_default();
            text(a).cmp(&text(b))
        }
    }
}

#[async_trait::async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check()?;
        Ok(self.doc(collection, id).map(|fields| Document::new(id, fields)))
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        self.check()?;
        self.insert(collection, id, fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        self.check()?;
        let mut collections = self.collections.borrow_mut();
        let existing = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or(StoreError::Status(404))?;
        if let (Some(target), Some(patch)) = (existing.as_object_mut(), fields.as_object()) {
            for (k, v) in patch {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        self.check()?;
        self.next_id.set(self.next_id.get() + 1);
        let id = format!("auto{}", self.next_id.get());
        self.insert(collection, &id, fields);
        Ok(id)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check()?;
        let mut docs: Vec<Document> = self
            .all(collection)
            .into_iter()
            .filter(|(_, fields)| query.matches(fields))
            .map(|(id, fields)| Document::new(id, fields))
            .collect();
        if let Some((field, direction)) = &query.order_by {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.fields.get(field), b.fields.get(field));
                if *direction == Direction::Descending { ord.reverse() } else { ord }
            });
        }
        Ok(docs)
    }
}

// =============================================================
// Identity
// =============================================================

#[derive(Default)]
pub(crate) struct FakeIdentity {
    sink: RefCell<Option<UnboundedSender<AuthTransition>>>,
    reject_with: RefCell<Option<IdentityError>>,
    calls: RefCell<Vec<String>>,
}

impl FakeIdentity {
    pub fn emit(&self, transition: AuthTransition) {
        if let Some(sink) = self.sink.borrow().as_ref() {
            let _ = sink.unbounded_send(transition);
        }
    }

    pub fn reject_with(&self, error: IdentityError) {
        *self.reject_with.borrow_mut() = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn accept(&self, call: String, email: &str) -> Result<AuthIdentity, IdentityError> {
        self.calls.borrow_mut().push(call);
        if let Some(error) = self.reject_with.borrow().clone() {
            return Err(error);
        }
        let identity = identity(&format!("uid-{email}"), email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FakeIdentity {
    fn subscribe(&self, sink: UnboundedSender<AuthTransition>) {
        *self.sink.borrow_mut() = Some(sink);
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthIdentity, IdentityError> {
        self.accept(format!("sign_in:{email}"), email)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthIdentity, IdentityError> {
        self.accept(format!("sign_up:{email}"), email)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.calls.borrow_mut().push("sign_out".to_owned());
        self.emit(None);
        Ok(())
    }
}

pub(crate) fn identity(uid: &str, email: &str) -> AuthIdentity {
    AuthIdentity { uid: uid.to_owned(), email: Some(email.to_owned()), ..AuthIdentity::default() }
}

// =============================================================
// Location
// =============================================================

pub(crate) struct FakeGeolocator {
    result: Cell<Result<Coords, GeoError>>,
}

impl FakeGeolocator {
    pub fn new(result: Result<Coords, GeoError>) -> Self {
        Self { result: Cell::new(result) }
    }
}

#[async_trait::async_trait(?Send)]
impl Geolocator for FakeGeolocator {
    async fn current_position(&self, _options: &GeolocationOptions) -> Result<Coords, GeoError> {
        self.result.get()
    }
}

pub(crate) struct FakeGeocoder(pub &'static str);

#[async_trait::async_trait(?Send)]
impl ReverseGeocoder for FakeGeocoder {
    async fn place_name(&self, _coords: Coords) -> String {
        self.0.to_owned()
    }
}

// =============================================================
// Assembled application
// =============================================================

pub(crate) const MOUNT: &str = "page-content-wrapper";

pub(crate) struct TestApp {
    pool: RefCell<LocalPool>,
    pub host: Rc<FakeHost>,
    pub templates: Rc<FakeTemplates>,
    pub store: Rc<MemoryStore>,
    pub identity: Rc<FakeIdentity>,
    pub hint_storage: Rc<MemoryHintStorage>,
    pub router: Router,
}

impl TestApp {
    /// Router over fakes with the standard behaviours, not yet booted: no
    /// auth listener or location acquisition is running.
    pub fn new() -> Self {
        Self::with_pages(PageRegistry::standard())
    }

    pub fn with_pages(pages: PageRegistry) -> Self {
        let pool = LocalPool::new();
        let host = Rc::new(FakeHost::new(pool.spawner()));
        let templates = Rc::new(FakeTemplates::default());
        let store = Rc::new(MemoryStore::default());
        let identity = Rc::new(FakeIdentity::default());
        let hint_storage = Rc::new(MemoryHintStorage::default());
        let config = Rc::new(AppConfig::default());
        let hint = SessionHint::new(hint_storage.clone(), config.session_hint_key.clone());
        let router = Router::new(RouterParts {
            config,
            host: host.clone(),
            templates: templates.clone(),
            app: Rc::new(AppState::new(hint)),
            services: Services { store: store.clone(), identity: identity.clone() },
            pages,
        });
        router.install();
        Self { pool: RefCell::new(pool), host, templates, store, identity, hint_storage, router }
    }

    /// Full startup through `boot::start`, with the given location outcome.
    pub fn booted(hash: &str, location: Result<Coords, GeoError>) -> Self {
        let pool = LocalPool::new();
        let host = Rc::new(FakeHost::new(pool.spawner()));
        host.put_hash(hash);
        let templates = Rc::new(FakeTemplates::default());
        let store = Rc::new(MemoryStore::default());
        let identity = Rc::new(FakeIdentity::default());
        let hint_storage = Rc::new(MemoryHintStorage::default());
        let router = boot::start(
            Rc::new(AppConfig::default()),
            Collaborators {
                host: host.clone(),
                templates: templates.clone(),
                hint_storage: hint_storage.clone(),
                store: store.clone(),
                identity: identity.clone(),
                geolocator: Rc::new(FakeGeolocator::new(location)),
                geocoder: Rc::new(FakeGeocoder("New Delhi, Delhi")),
            },
        );
        Self { pool: RefCell::new(pool), host, templates, store, identity, hint_storage, router }
    }

    pub fn app(&self) -> &Rc<AppState> {
        self.router.app()
    }

    /// Run spawned tasks until none can make progress.
    pub fn run(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Drive one page load to completion (and any tasks it spawns).
    pub fn load(&self, hash: &str) -> crate::router::LoadOutcome {
        self.host.put_hash(hash);
        let outcome = self.pool.borrow_mut().run_until(self.router.load_page(hash));
        self.run();
        outcome
    }

    /// Sign `uid` in through the auth listener path and wait for it to settle.
    pub fn sign_in_as(&self, uid: &str, email: &str) {
        self.identity.emit(Some(identity(uid, email)));
        self.run();
    }

    /// Spawn the auth listener for a router built with [`TestApp::new`].
    pub fn start_auth_listener(&self) {
        let (tx, rx) = mpsc::unbounded();
        self.identity.subscribe(tx);
        let router = self.router.clone();
        self.host.spawn(Box::pin(crate::services::auth::run_auth_listener(router, rx)));
    }
}
