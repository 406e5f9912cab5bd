//! Identity-provider seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider pushes authentication transitions (`Some(identity)` on
//! sign-in or session restore, `None` on sign-out) into a channel owned by
//! the auth listener. The first transition after startup is what resolves the
//! initial auth check, so a provider must always emit at least one.

use futures::channel::mpsc::UnboundedSender;

/// Authenticated principal as reported by the identity provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// `Some` for a signed-in identity, `None` for signed out.
pub type AuthTransition = Option<AuthIdentity>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The provider refused the credentials; the message is user-presentable.
    #[error("{0}")]
    Rejected(String),
    #[error("identity request failed: {0}")]
    Transport(String),
    #[error("identity provider is not configured")]
    NotConfigured,
}

#[async_trait::async_trait(?Send)]
pub trait IdentityProvider {
    /// Register the transition sink. Providers emit the current state once
    /// the session restore attempt finishes, then every later change.
    fn subscribe(&self, sink: UnboundedSender<AuthTransition>);

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, IdentityError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}
