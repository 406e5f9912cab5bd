//! Page-template loading.
//!
//! ERROR HANDLING
//! ==============
//! Every failure carries the template location so the router can render it
//! inside the error panel. A non-success status, a transport error, and a
//! timeout are distinct variants; the router treats them identically.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Page not found: {location} (HTTP {status})")]
    Status { location: String, status: u16 },
    #[error("Could not load {location}: {message}")]
    Network { location: String, message: String },
    #[error("Timed out loading {location}")]
    Timeout { location: String },
}

impl LoadError {
    pub fn location(&self) -> &str {
        match self {
            LoadError::Status { location, .. }
            | LoadError::Network { location, .. }
            | LoadError::Timeout { location } => location,
        }
    }
}

#[async_trait::async_trait(?Send)]
pub trait TemplateLoader {
    /// Fetch the raw markup stored at `location`.
    async fn fetch(&self, location: &str) -> Result<String, LoadError>;
}

/// Loads templates over HTTP relative to the document, bounded by a timeout.
pub struct HttpTemplateLoader {
    timeout_ms: u32,
}

impl HttpTemplateLoader {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait::async_trait(?Send)]
impl TemplateLoader for HttpTemplateLoader {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        #[cfg(feature = "csr")]
        {
            use futures::future::{Either, select};

            let request = fetch_text(location);
            let timeout = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
            futures::pin_mut!(request);
            match select(request, timeout).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => {
                    log::warn!("template {location} timed out after {}ms", self.timeout_ms);
                    Err(LoadError::Timeout { location: location.to_owned() })
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = self.timeout_ms;
            Err(LoadError::Network {
                location: location.to_owned(),
                message: "not available outside the browser".to_owned(),
            })
        }
    }
}

#[cfg(feature = "csr")]
async fn fetch_text(location: &str) -> Result<String, LoadError> {
    let network = |e: gloo_net::Error| LoadError::Network {
        location: location.to_owned(),
        message: e.to_string(),
    };
    let resp = gloo_net::http::Request::get(location).send().await.map_err(network)?;
    if !resp.ok() {
        return Err(LoadError::Status { location: location.to_owned(), status: resp.status() });
    }
    resp.text().await.map_err(network)
}
