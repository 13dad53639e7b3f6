//! Remote chat gateway

pub mod http;

use crate::{ChatReply, Result};
use async_trait::async_trait;

pub use http::HttpGateway;

/// The two backend calls the client makes.
///
/// Each call resolves or fails exactly once; there is no retry, backoff
/// or cancellation at this layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Query the health endpoint, returning its JSON body
    async fn check_health(&self) -> Result<serde_json::Value>;

    /// Send one user message and wait for the full reply
    async fn send_message(&self, text: &str, session_id: &str) -> Result<ChatReply>;
}
