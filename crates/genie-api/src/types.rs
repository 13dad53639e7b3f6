//! Wire types for the DataGenie backend

use serde::{Deserialize, Deserializer, Serialize};

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "https://datagenie-backend.vercel.app/api";

/// Endpoint paths relative to the base URL
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const CHAT: &str = "/chat";
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
        }
    }
}

/// Successful answer from `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Main answer text
    pub content: String,
    /// Supplementary findings; absent and `null` both decode to empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub insights: Vec<String>,
    /// Confidence score, nominally in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ChatReply {
    /// Create a reply with only text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            insights: Vec::new(),
            confidence: None,
        }
    }

    pub fn with_insights<I, S>(mut self, insights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insights = insights.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
