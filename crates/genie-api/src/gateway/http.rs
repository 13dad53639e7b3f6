//! reqwest-backed gateway

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::ChatGateway;
use crate::{
    auth::{StaticSession, TokenSource},
    error::{Error, Result},
    types::{ChatReply, ChatRequest, DEFAULT_BASE_URL, endpoints},
};

/// HTTP client for the DataGenie backend
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<dyn TokenSource>,
}

impl HttpGateway {
    /// Create an anonymous gateway for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: Arc::new(StaticSession::anonymous()),
        }
    }

    /// Attach the source consulted for a bearer token on each chat call
    pub fn with_token_source(mut self, auth: Arc<dyn TokenSource>) -> Self {
        self.auth = auth;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into `T`, mapping non-2xx to `Error::Status`
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::status(status.as_u16(), text));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn check_health(&self) -> Result<serde_json::Value> {
        let url = self.url(endpoints::HEALTH);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::read_json(response).await
    }

    async fn send_message(&self, text: &str, session_id: &str) -> Result<ChatReply> {
        let url = self.url(endpoints::CHAT);
        let body = ChatRequest::new(text, session_id);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(token) = self.auth.session().await.token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        tracing::debug!(session_id, "POST {}", url);
        let response = request.send().await?;
        Self::read_json(response).await
    }
}
