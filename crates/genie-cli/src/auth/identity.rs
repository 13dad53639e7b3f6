//! Email/password sign-in against a GoTrue-compatible identity provider

use super::storage::Credentials;
use serde::Deserialize;

/// Identity provider endpoint plus the public key it expects on every call
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl IdentityProvider {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Exchange email and password for a session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Credentials, String> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let token = self
            .request_token("password", &body)
            .await
            .map_err(|e| format!("Sign-in failed: {}", e))?;
        Ok(token.into_credentials(email))
    }

    /// Trade a refresh token for a fresh session
    pub async fn refresh(&self, current: &Credentials) -> Result<Credentials, String> {
        if current.refresh.is_empty() {
            return Err("No refresh token stored".to_string());
        }
        let body = serde_json::json!({ "refresh_token": current.refresh });
        let token = self
            .request_token("refresh_token", &body)
            .await
            .map_err(|e| format!("Token refresh failed: {}", e))?;
        Ok(token.into_credentials(&current.email))
    }

    async fn request_token(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> Result<TokenResponse, String> {
        let url = format!("{}/token?grant_type={}", self.url, grant_type);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(describe_error(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse token response: {}", e))
    }
}

/// Pull the human-readable part out of a GoTrue error body
fn describe_error(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_description.or(b.msg).or(b.message));
    match message {
        Some(m) => m,
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => format!("HTTP {}: {}", status, body.trim()),
    }
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Deserialize, Debug)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl TokenResponse {
    fn into_credentials(self, fallback_email: &str) -> Credentials {
        let email = self
            .user
            .and_then(|u| u.email)
            .unwrap_or_else(|| fallback_email.to_string());
        Credentials::new(
            self.access_token,
            self.refresh_token.unwrap_or_default(),
            self.expires_in,
            email,
        )
    }
}
