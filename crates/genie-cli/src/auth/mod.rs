//! Sign-in support: stored credentials and the identity provider

mod identity;
mod storage;

pub use identity::IdentityProvider;
pub use storage::{Credentials, load_credentials, remove_credentials, save_credentials};

use async_trait::async_trait;
use genie_api::{AuthSession, TokenSource};
use std::path::PathBuf;

/// Environment variable that overrides stored credentials with a raw token
pub const TOKEN_ENV: &str = "GENIE_TOKEN";

/// Name shown for a session whose token came from [`TOKEN_ENV`]
pub const ENV_TOKEN_NAME: &str = "token from environment";

/// A non-empty token override, if one is set
fn token_override(value: Option<String>) -> Option<String> {
    value.filter(|token| !token.is_empty())
}

/// Token source backed by the credentials file.
///
/// Expired credentials are refreshed through the identity provider when
/// one is configured; if that fails they are removed and requests go out
/// anonymously.
pub struct StoredSession {
    path: PathBuf,
    provider: Option<IdentityProvider>,
    env_token: Option<String>,
}

impl StoredSession {
    /// Stored session in the default location, honouring [`TOKEN_ENV`]
    pub fn new(provider: Option<IdentityProvider>) -> Self {
        Self {
            path: storage::credentials_file(),
            provider,
            env_token: token_override(std::env::var(TOKEN_ENV).ok()),
        }
    }

    /// Stored session read from `path`, with an explicit token override
    pub fn at(path: PathBuf, provider: Option<IdentityProvider>, env_token: Option<String>) -> Self {
        Self {
            path,
            provider,
            env_token: token_override(env_token),
        }
    }

    async fn refresh(&self, credentials: Credentials) -> Option<Credentials> {
        let Some(provider) = &self.provider else {
            tracing::warn!("Stored session expired and no identity provider is configured");
            return None;
        };

        match provider.refresh(&credentials).await {
            Ok(fresh) => {
                if let Err(e) = storage::save_to(&self.path, &fresh) {
                    tracing::warn!("Failed to save refreshed credentials: {}", e);
                }
                Some(fresh)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh session for {}: {}", credentials.email, e);
                let _ = storage::remove_from(&self.path);
                None
            }
        }
    }
}

#[async_trait]
impl TokenSource for StoredSession {
    async fn session(&self) -> AuthSession {
        if let Some(token) = &self.env_token {
            return AuthSession::authenticated(token.clone(), ENV_TOKEN_NAME);
        }

        let Some(credentials) = storage::load_from(&self.path) else {
            return AuthSession::Anonymous;
        };

        let credentials = if credentials.is_expired() {
            match self.refresh(credentials).await {
                Some(fresh) => fresh,
                None => return AuthSession::Anonymous,
            }
        } else {
            credentials
        };

        let name = credentials.display_name().to_string();
        AuthSession::authenticated(credentials.access, name)
    }
}

/// Sign in and persist the session
pub async fn login(provider: &IdentityProvider, email: &str, password: &str) -> Result<Credentials, String> {
    let credentials = provider.sign_in(email, password).await?;
    save_credentials(&credentials).map_err(|e| format!("Failed to save credentials: {}", e))?;
    Ok(credentials)
}

/// Forget the stored session
pub fn logout() -> Result<(), String> {
    remove_credentials().map_err(|e| format!("Failed to remove credentials: {}", e))
}


#[cfg(test)]
mod tests {
    use super::testing::serve_once;
    use super::*;

    fn temp_creds(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("genie-session-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("credentials.json")
    }

    fn expired(email: &str) -> Credentials {
        Credentials::new("old-token".into(), "r1".into(), 0, email.into())
    }

    #[test]
    fn test_empty_override_is_ignored() {
        assert_eq!(token_override(None), None);
        assert_eq!(token_override(Some(String::new())), None);
        assert_eq!(token_override(Some("tok".into())), Some("tok".into()));
    }

    #[tokio::test]
    async fn test_env_token_wins_over_stored_credentials() {
        let path = temp_creds("env");
        let fresh = Credentials::new("stored".into(), "r".into(), 3600, "demo@x.io".into());
        storage::save_to(&path, &fresh).unwrap();

        let source = StoredSession::at(path.clone(), None, Some("from-env".into()));
        let session = source.session().await;
        assert_eq!(session.token(), Some("from-env"));
        assert_eq!(session.display_name(), Some(ENV_TOKEN_NAME));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_empty_env_token_falls_through_to_stored() {
        let path = temp_creds("empty-env");
        let fresh = Credentials::new("stored".into(), "r".into(), 3600, "demo@x.io".into());
        storage::save_to(&path, &fresh).unwrap();

        let source = StoredSession::at(path.clone(), None, Some(String::new()));
        let session = source.session().await;
        assert_eq!(session.token(), Some("stored"));
        assert_eq!(session.display_name(), Some("demo"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_no_credentials_is_anonymous() {
        let source = StoredSession::at(temp_creds("none"), None, None);
        assert_eq!(source.session().await, AuthSession::Anonymous);
    }

    #[tokio::test]
    async fn test_expired_without_provider_is_anonymous() {
        let path = temp_creds("no-provider");
        storage::save_to(&path, &expired("me@x.io")).unwrap();

        let source = StoredSession::at(path.clone(), None, None);
        assert_eq!(source.session().await, AuthSession::Anonymous);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_failed_refresh_removes_credentials() {
        let path = temp_creds("refresh-fails");
        storage::save_to(&path, &expired("me@x.io")).unwrap();
        let (url, _server) = serve_once(
            "400 Bad Request",
            r#"{"error":"invalid_grant","error_description":"Refresh Token Not Found"}"#,
        )
        .await;

        let source = StoredSession::at(path.clone(), Some(IdentityProvider::new(url, "k")), None);
        assert_eq!(source.session().await, AuthSession::Anonymous);
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_successful_refresh_saves_new_token() {
        let path = temp_creds("refresh-ok");
        storage::save_to(&path, &expired("me@x.io")).unwrap();
        let (url, server) = serve_once(
            "200 OK",
            r#"{"access_token":"new-token","refresh_token":"r2","expires_in":3600}"#,
        )
        .await;

        let source = StoredSession::at(path.clone(), Some(IdentityProvider::new(url, "k")), None);
        let session = source.session().await;
        assert_eq!(session.token(), Some("new-token"));
        assert_eq!(session.display_name(), Some("me"));
        assert!(server.await.unwrap().contains("grant_type=refresh_token"));

        let saved = storage::load_from(&path).unwrap();
        assert_eq!(saved.access, "new-token");
        assert_eq!(saved.refresh, "r2");
        assert!(!saved.is_expired());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
