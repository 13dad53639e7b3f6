//! Conversation log entries

use chrono::{DateTime, Local};
use genie_api::ChatReply;
use serde::Serialize;

/// Who (or what) produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    Assistant,
    System,
    Error,
}

impl MessageKind {
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::User => "You",
            MessageKind::Assistant => "DataGenie",
            MessageKind::System => "System",
            MessageKind::Error => "Error",
        }
    }
}

/// One immutable entry in the conversation log.
///
/// Fields are read-only from outside the crate; messages are only ever
/// created by [`crate::Conversation`] when it appends them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: u64,
    kind: MessageKind,
    content: String,
    insights: Vec<String>,
    confidence: Option<f64>,
    created_at: DateTime<Local>,
}

impl Message {
    fn new(id: u64, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            insights: Vec::new(),
            confidence: None,
            created_at: Local::now(),
        }
    }

    pub(crate) fn user(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, MessageKind::User, content)
    }

    pub(crate) fn system(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, MessageKind::System, content)
    }

    pub(crate) fn error(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, MessageKind::Error, content)
    }

    pub(crate) fn assistant(id: u64, reply: ChatReply) -> Self {
        Self {
            insights: reply.insights,
            confidence: reply.confidence,
            ..Self::new(id, MessageKind::Assistant, reply.content)
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Wall-clock time the message was appended, e.g. `14:03:27`
    pub fn timestamp(&self) -> String {
        self.created_at.format("%H:%M:%S").to_string()
    }

    /// Confidence as a whole percentage clamped to 0..=100
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence
            .map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}
