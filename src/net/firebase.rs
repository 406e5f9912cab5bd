//! Firebase REST implementations of the identity and document-store seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client talks to three Google endpoints directly from the browser:
//! Identity Toolkit (email/password sign-in and sign-up), Secure Token
//! (refresh-token exchange on startup), and Firestore's REST document API.
//! No vendor SDK is loaded.
//!
//! DESIGN
//! ======
//! `FirebaseAuth` owns the session (uid + id/refresh tokens), persists it in
//! `localStorage` and broadcasts transitions to every subscribed sink.
//! `Firestore` borrows the current id token from it for each request and
//! retries once with a refreshed token on `401`.
//!
//! ERROR HANDLING
//! ==============
//! Identity errors are mapped to user-presentable text; store errors carry
//! the HTTP status. A failed startup refresh is logged and treated as a
//! sign-out so the initial auth check always resolves.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "firebase_test.rs"]
mod firebase_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedSender;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::identity::{AuthIdentity, AuthTransition, IdentityError, IdentityProvider};
use super::store::{Document, DocumentStore, Query, StoreError};
use crate::config::FirebaseConfig;
use crate::util::persistence;

#[cfg(any(test, feature = "csr"))]
use super::firestore_value::{decode_fields, encode_fields, encode_value};
#[cfg(any(test, feature = "csr"))]
use super::store::Direction;

pub const SESSION_STORAGE_KEY: &str = "drywash.auth_session";

#[cfg(any(test, feature = "csr"))]
const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1/accounts";
#[cfg(any(test, feature = "csr"))]
const TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
#[cfg(any(test, feature = "csr"))]
const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Persisted refresh session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
}

impl StoredSession {
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// `accounts:signInWithPassword` / `accounts:signUp` response.
#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    #[serde(rename = "profilePicture")]
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[cfg(any(test, feature = "csr"))]
impl From<PasswordAuthResponse> for StoredSession {
    fn from(r: PasswordAuthResponse) -> Self {
        Self {
            uid: r.local_id,
            email: r.email,
            display_name: r.display_name.filter(|n| !n.is_empty()),
            photo_url: r.photo_url.filter(|p| !p.is_empty()),
            id_token: r.id_token,
            refresh_token: r.refresh_token,
        }
    }
}

/// Secure Token exchange response (snake_case on the wire).
#[cfg(feature = "csr")]
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map an Identity Toolkit error body to text suitable for an alert.
#[cfg(any(test, feature = "csr"))]
fn auth_error_message(body: &str) -> String {
    let code = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "UNKNOWN_ERROR".to_owned());
    // Codes may carry a detail suffix: "WEAK_PASSWORD : Password should be ..."
    let (head, detail) = code.split_once(" : ").unwrap_or((code.as_str(), ""));
    match head {
        "EMAIL_EXISTS" => "The email address is already in use by another account.".to_owned(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password.".to_owned()
        }
        "INVALID_EMAIL" => "The email address is badly formatted.".to_owned(),
        "USER_DISABLED" => "This account has been disabled.".to_owned(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.".to_owned(),
        "WEAK_PASSWORD" if !detail.is_empty() => detail.to_owned(),
        "WEAK_PASSWORD" => "Password should be at least 6 characters.".to_owned(),
        other => other.to_owned(),
    }
}

#[cfg(any(test, feature = "csr"))]
fn identity_url(method: &str, api_key: &str) -> String {
    format!("{IDENTITY_BASE}:{method}?key={api_key}")
}

#[cfg(any(test, feature = "csr"))]
fn token_url(api_key: &str) -> String {
    format!("{TOKEN_URL}?key={api_key}")
}

#[cfg(any(test, feature = "csr"))]
fn refresh_form(refresh_token: &str) -> String {
    serde_urlencoded::to_string([("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
        .unwrap_or_default()
}

// =============================================================
// Identity
// =============================================================

struct AuthInner {
    config: FirebaseConfig,
    session: RefCell<Option<StoredSession>>,
    sinks: RefCell<Vec<UnboundedSender<AuthTransition>>>,
}

/// Email/password identity provider over the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseAuth {
    inner: Rc<AuthInner>,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            inner: Rc::new(AuthInner {
                config,
                session: RefCell::new(persistence::load_json(SESSION_STORAGE_KEY)),
                sinks: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn id_token(&self) -> Option<String> {
        self.inner.session.borrow().as_ref().map(|s| s.id_token.clone())
    }

    fn current(&self) -> AuthTransition {
        self.inner.session.borrow().as_ref().map(StoredSession::identity)
    }

    fn store_session(&self, session: Option<StoredSession>) {
        match &session {
            Some(s) => persistence::save_json(SESSION_STORAGE_KEY, s),
            None => persistence::remove(SESSION_STORAGE_KEY),
        }
        *self.inner.session.borrow_mut() = session;
    }

    fn broadcast(&self) {
        let transition = self.current();
        self.inner
            .sinks
            .borrow_mut()
            .retain(|sink| sink.unbounded_send(transition.clone()).is_ok());
    }

    /// Exchange the stored refresh token for a fresh id token.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] when there is no session or the exchange
    /// is refused; a refused exchange also clears the stored session.
    pub async fn refresh(&self) -> Result<String, IdentityError> {
        let Some(refresh_token) =
            self.inner.session.borrow().as_ref().map(|s| s.refresh_token.clone())
        else {
            return Err(IdentityError::Rejected("not signed in".to_owned()));
        };
        #[cfg(feature = "csr")]
        {
            let url = token_url(&self.inner.config.api_key);
            let resp = gloo_net::http::Request::post(&url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(refresh_form(&refresh_token))
                .map_err(|e| IdentityError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| IdentityError::Transport(e.to_string()))?;
            if !resp.ok() {
                let body = resp.text().await.unwrap_or_default();
                self.store_session(None);
                return Err(IdentityError::Rejected(auth_error_message(&body)));
            }
            let token: TokenResponse =
                resp.json().await.map_err(|e| IdentityError::Transport(e.to_string()))?;
            let mut session = self.inner.session.borrow().clone().ok_or(IdentityError::NotConfigured)?;
            if session.uid != token.user_id {
                log::warn!("refreshed token belongs to a different user; discarding session");
                self.store_session(None);
                return Err(IdentityError::Rejected("session mismatch".to_owned()));
            }
            session.id_token.clone_from(&token.id_token);
            session.refresh_token = token.refresh_token;
            self.store_session(Some(session));
            Ok(token.id_token)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = refresh_token;
            Err(IdentityError::NotConfigured)
        }
    }

    async fn restore(&self) {
        if self.inner.session.borrow().is_some() {
            if let Err(e) = self.refresh().await {
                log::warn!("session restore failed: {e}");
                self.store_session(None);
            }
        }
        self.broadcast();
    }

    async fn password_auth(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, IdentityError> {
        if !self.inner.config.is_configured() {
            return Err(IdentityError::NotConfigured);
        }
        #[cfg(feature = "csr")]
        {
            let url = identity_url(method, &self.inner.config.api_key);
            let payload =
                serde_json::json!({ "email": email, "password": password, "returnSecureToken": true });
            let resp = gloo_net::http::Request::post(&url)
                .json(&payload)
                .map_err(|e| IdentityError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| IdentityError::Transport(e.to_string()))?;
            if !resp.ok() {
                let body = resp.text().await.unwrap_or_default();
                return Err(IdentityError::Rejected(auth_error_message(&body)));
            }
            let body: PasswordAuthResponse =
                resp.json().await.map_err(|e| IdentityError::Transport(e.to_string()))?;
            let session = StoredSession::from(body);
            let identity = session.identity();
            self.store_session(Some(session));
            self.broadcast();
            Ok(identity)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (method, email, password);
            Err(IdentityError::NotConfigured)
        }
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FirebaseAuth {
    fn subscribe(&self, sink: UnboundedSender<AuthTransition>) {
        self.inner.sinks.borrow_mut().push(sink);
        let auth = self.clone();
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move { auth.restore().await });
        #[cfg(not(feature = "csr"))]
        futures::executor::block_on(auth.restore());
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, IdentityError> {
        self.password_auth("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, IdentityError> {
        self.password_auth("signUp", email, password).await
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.store_session(None);
        self.broadcast();
        Ok(())
    }
}

// =============================================================
// Documents
// =============================================================

#[cfg(any(test, feature = "csr"))]
fn documents_base(project_id: &str) -> String {
    format!("{FIRESTORE_BASE}/projects/{project_id}/databases/(default)/documents")
}

#[cfg(any(test, feature = "csr"))]
fn update_url(project_id: &str, collection: &str, id: &str, fields: &Value) -> String {
    let mut pairs: Vec<(&str, &str)> = fields
        .as_object()
        .map(|o| o.keys().map(|k| ("updateMask.fieldPaths", k.as_str())).collect())
        .unwrap_or_default();
    pairs.push(("currentDocument.exists", "true"));
    let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    format!("{}/{collection}/{id}?{query}", documents_base(project_id))
}

#[cfg(any(test, feature = "csr"))]
fn structured_query(collection: &str, query: &Query) -> Value {
    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|(field, value)| {
            serde_json::json!({ "fieldFilter": {
                "field": { "fieldPath": field },
                "op": "EQUAL",
                "value": encode_value(value),
            } })
        })
        .collect();
    let mut structured = serde_json::json!({ "from": [{ "collectionId": collection }] });
    match filters.as_slice() {
        [] => {}
        [only] => structured["where"] = only.clone(),
        _ => {
            structured["where"] =
                serde_json::json!({ "compositeFilter": { "op": "AND", "filters": filters } });
        }
    }
    if let Some((field, direction)) = &query.order_by {
        let direction = match direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured["orderBy"] =
            serde_json::json!([{ "field": { "fieldPath": field }, "direction": direction }]);
    }
    serde_json::json!({ "structuredQuery": structured })
}

/// Convert a REST document (`{name, fields}`) into a [`Document`].
#[cfg(any(test, feature = "csr"))]
fn document_from_rest(raw: &Value) -> Option<Document> {
    let id = raw.get("name")?.as_str()?.rsplit('/').next()?.to_owned();
    let fields = raw.get("fields").map_or_else(|| Value::Object(serde_json::Map::new()), decode_fields);
    Some(Document::new(id, fields))
}

/// Rows of a `:runQuery` response; rows without a document are skipped.
#[cfg(any(test, feature = "csr"))]
fn documents_from_run_query(rows: &[Value]) -> Vec<Document> {
    rows.iter().filter_map(|row| row.get("document")).filter_map(document_from_rest).collect()
}

#[cfg(any(test, feature = "csr"))]
fn rest_body(fields: &Value) -> Value {
    let map = fields.as_object().cloned().unwrap_or_default();
    serde_json::json!({ "fields": encode_fields(&map) })
}

/// Document store over the Firestore REST API.
pub struct Firestore {
    project_id: String,
    auth: FirebaseAuth,
}

impl Firestore {
    pub fn new(config: &FirebaseConfig, auth: FirebaseAuth) -> Self {
        Self { project_id: config.project_id.clone(), auth }
    }
}

#[cfg(feature = "csr")]
impl Firestore {
    /// Send a request, retrying once with a refreshed token on `401`.
    async fn send<F>(&self, build: F) -> Result<gloo_net::http::Response, StoreError>
    where
        F: Fn(Option<&str>) -> Result<gloo_net::http::Request, gloo_net::Error>,
    {
        let transport = |e: gloo_net::Error| StoreError::Transport(e.to_string());
        let token = self.auth.id_token();
        let resp = build(token.as_deref()).map_err(transport)?.send().await.map_err(transport)?;
        if resp.status() != 401 || token.is_none() {
            return Ok(resp);
        }
        let token = self.auth.refresh().await.map_err(|e| {
            log::warn!("token refresh failed: {e}");
            StoreError::Unauthenticated
        })?;
        build(Some(&token)).map_err(transport)?.send().await.map_err(transport)
    }

    async fn json_body(resp: gloo_net::http::Response) -> Result<Value, StoreError> {
        if !resp.ok() {
            return Err(StoreError::Status(resp.status()));
        }
        resp.json::<Value>().await.map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(feature = "csr")]
fn with_bearer(
    builder: gloo_net::http::RequestBuilder,
    token: Option<&str>,
) -> gloo_net::http::RequestBuilder {
    match token {
        Some(t) => builder.header("Authorization", &format!("Bearer {t}")),
        None => builder,
    }
}

#[async_trait::async_trait(?Send)]
impl DocumentStore for Firestore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            let url = format!("{}/{collection}/{id}", documents_base(&self.project_id));
            let resp = self.send(|t| with_bearer(Request::get(&url), t).build()).await?;
            if resp.status() == 404 {
                return Ok(None);
            }
            let body = Self::json_body(resp).await?;
            document_from_rest(&body)
                .map(Some)
                .ok_or_else(|| StoreError::Decode("document without name".to_owned()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.project_id, &self.auth, collection, id);
            Err(StoreError::Transport("not available outside the browser".to_owned()))
        }
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            let url = format!("{}/{collection}/{id}", documents_base(&self.project_id));
            let body = rest_body(&fields);
            let resp = self.send(|t| with_bearer(Request::patch(&url), t).json(&body)).await?;
            Self::json_body(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (collection, id, fields);
            Err(StoreError::Transport("not available outside the browser".to_owned()))
        }
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            let url = update_url(&self.project_id, collection, id, &fields);
            let body = rest_body(&fields);
            let resp = self.send(|t| with_bearer(Request::patch(&url), t).json(&body)).await?;
            Self::json_body(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (collection, id, fields);
            Err(StoreError::Transport("not available outside the browser".to_owned()))
        }
    }

    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            let url = format!("{}/{collection}", documents_base(&self.project_id));
            let body = rest_body(&fields);
            let resp = self.send(|t| with_bearer(Request::post(&url), t).json(&body)).await?;
            let created = Self::json_body(resp).await?;
            document_from_rest(&created)
                .map(|doc| doc.id)
                .ok_or_else(|| StoreError::Decode("created document without name".to_owned()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (collection, fields);
            Err(StoreError::Transport("not available outside the browser".to_owned()))
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            let url = format!("{}:runQuery", documents_base(&self.project_id));
            let body = structured_query(collection, query);
            let resp = self.send(|t| with_bearer(Request::post(&url), t).json(&body)).await?;
            let rows = Self::json_body(resp).await?;
            let rows = rows.as_array().map(Vec::as_slice).unwrap_or_default();
            Ok(documents_from_run_query(rows))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (collection, query);
            Err(StoreError::Transport("not available outside the browser".to_owned()))
        }
    }
}
