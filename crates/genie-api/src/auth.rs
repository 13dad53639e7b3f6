//! Authentication seam between the gateway and whatever signs the user in.
//!
//! The gateway only ever asks "is there a bearer token for this call?".
//! Concrete identity providers live with the application.

use async_trait::async_trait;

/// Who the current user is, as far as outgoing requests care
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthSession {
    /// No credentials; requests go out without an Authorization header
    #[default]
    Anonymous,
    /// Signed in with a bearer token
    Authenticated { token: String, display_name: String },
}

impl AuthSession {
    pub fn authenticated(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::Authenticated {
            token: token.into(),
            display_name: display_name.into(),
        }
    }

    /// Bearer token, if signed in
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthSession::Anonymous => None,
            AuthSession::Authenticated { token, .. } => Some(token),
        }
    }

    /// Name to show in the UI, if signed in
    pub fn display_name(&self) -> Option<&str> {
        match self {
            AuthSession::Anonymous => None,
            AuthSession::Authenticated { display_name, .. } => Some(display_name),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthSession::Authenticated { .. })
    }
}

/// Source of the current auth session, consulted once per outgoing chat call
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn session(&self) -> AuthSession;
}

/// A token source that always returns the same session
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub AuthSession);

impl StaticSession {
    pub fn anonymous() -> Self {
        Self(AuthSession::Anonymous)
    }
}

#[async_trait]
impl TokenSource for StaticSession {
    async fn session(&self) -> AuthSession {
        self.0.clone()
    }
}
