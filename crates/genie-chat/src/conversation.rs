//! Conversation store: the append-only message log and its single-flight state machine.
//!
//! ```text
//!            submit(text)  [!pending && !text.trim().is_empty()]
//!   Idle  ─────────────────────────────────────────────────────▶  Sending
//!    ▲                                                              │
//!    └──────────── complete(turn, Ok(reply) | Err(error)) ──────────┘
//! ```
//!
//! Every accepted submit yields a [`PendingTurn`]. The turn is not `Clone`
//! and [`Conversation::complete`] consumes it, so each accepted submit gets
//! exactly one terminal (assistant or error) message.

use genie_api::ChatReply;

use crate::message::{Message, MessageKind};
use crate::session_id::SessionIds;

/// Banner seeded as the first message of every conversation
pub const WELCOME_MESSAGE: &str = "Welcome to DataGenie! I'm your AI business intelligence analyst. \
Test the connection to our live backend!";

/// An accepted submission whose gateway call has not settled yet
#[derive(Debug)]
pub struct PendingTurn {
    user_message_id: u64,
    text: String,
    session_id: String,
}

impl PendingTurn {
    /// Id of the user message this turn answers
    pub fn user_message_id(&self) -> u64 {
        self.user_message_id
    }

    /// Text to send, exactly as submitted
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Session id to send with this call
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Ordered message log plus the in-flight flag
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: bool,
    next_id: u64,
    session_ids: SessionIds,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A fresh conversation, idle, holding only the welcome banner
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            pending: false,
            next_id: 1,
            session_ids: SessionIds::new(),
        };
        conversation.notify(WELCOME_MESSAGE);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether a chat call is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether `submit` would currently accept `text`
    pub fn can_submit(&self, text: &str) -> bool {
        !self.pending && !text.trim().is_empty()
    }

    /// Idle → Sending.
    ///
    /// Rejected silently (returns `None`, nothing changes) while a call is
    /// pending or when `text` is empty or whitespace-only. Submissions made
    /// while pending are dropped, not queued.
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        if !self.can_submit(text) {
            tracing::debug!(pending = self.pending, "submit rejected");
            return None;
        }

        let id = self.push(|id| Message::user(id, text));
        self.pending = true;

        Some(PendingTurn {
            user_message_id: id,
            text: text.to_string(),
            session_id: self.session_ids.next_id(),
        })
    }

    /// Sending → Idle, appending the terminal message for `turn`
    pub fn complete(&mut self, turn: PendingTurn, outcome: genie_api::Result<ChatReply>) -> &Message {
        match outcome {
            Ok(reply) => {
                tracing::debug!(
                    session_id = %turn.session_id,
                    insights = reply.insights.len(),
                    "chat call succeeded"
                );
                self.push(|id| Message::assistant(id, reply));
            }
            Err(e) => {
                tracing::warn!(session_id = %turn.session_id, "chat call failed: {}", e);
                self.push(|id| Message::error(id, failure_text(&e)));
            }
        }
        self.pending = false;

        // push always appends, so the log is non-empty here
        &self.messages[self.messages.len() - 1]
    }

    /// Append a system notice; allowed in any state and leaves `pending` alone
    pub fn notify(&mut self, text: impl Into<String>) -> &Message {
        let text = text.into();
        self.push(|id| Message::system(id, text));
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages of the given kind
    pub fn count(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind() == kind).count()
    }

    fn push(&mut self, build: impl FnOnce(u64) -> Message) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(build(id));
        id
    }
}

/// User-facing text for a failed chat call
pub fn failure_text(error: &genie_api::Error) -> String {
    format!("Connection error: {}. Check if the backend is running.", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genie_api::Error;

    fn reply() -> ChatReply {
        ChatReply::text("Revenue is $1M")
            .with_insights(["Q1 up 5%"])
            .with_confidence(0.9)
    }

    #[test]
    fn test_new_conversation_is_seeded_and_idle() {
        let conv = Conversation::new();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].kind(), MessageKind::System);
        assert_eq!(conv.messages()[0].content(), WELCOME_MESSAGE);
        assert!(!conv.is_pending());
    }

    #[test]
    fn test_submit_appends_user_message_and_goes_pending() {
        let mut conv = Conversation::new();
        let turn = conv.submit("Show revenue").unwrap();

        assert_eq!(conv.len(), 2);
        let last = conv.last().unwrap();
        assert_eq!(last.kind(), MessageKind::User);
        assert_eq!(last.content(), "Show revenue");
        assert_eq!(turn.user_message_id(), last.id());
        assert_eq!(turn.text(), "Show revenue");
        assert!(turn.session_id().starts_with("session-"));
        assert!(conv.is_pending());
    }

    #[test]
    fn test_submit_keeps_text_as_typed() {
        let mut conv = Conversation::new();
        conv.submit("  padded  ").unwrap();
        assert_eq!(conv.last().unwrap().content(), "  padded  ");
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut conv = Conversation::new();
        let _turn = conv.submit("first").unwrap();

        assert!(conv.submit("second").is_none());
        assert_eq!(conv.len(), 2);
        assert!(conv.is_pending());
        assert_eq!(conv.last().unwrap().content(), "first");
    }

    #[test]
    fn test_submit_empty_or_whitespace_is_noop() {
        let mut conv = Conversation::new();
        for text in ["", "   ", "\t\n "] {
            assert!(conv.submit(text).is_none());
        }
        assert_eq!(conv.len(), 1);
        assert!(!conv.is_pending());

        // Also rejected while pending
        let _turn = conv.submit("real").unwrap();
        assert!(conv.submit("").is_none());
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn test_complete_success_appends_assistant() {
        let mut conv = Conversation::new();
        let turn = conv.submit("Show revenue").unwrap();
        let msg = conv.complete(turn, Ok(reply()));

        assert_eq!(msg.kind(), MessageKind::Assistant);
        assert_eq!(msg.content(), "Revenue is $1M");
        assert_eq!(msg.insights(), ["Q1 up 5%"]);
        assert_eq!(msg.confidence(), Some(0.9));
        assert!(!conv.is_pending());
        assert_eq!(conv.len(), 3);
    }

    #[test]
    fn test_complete_success_without_insights() {
        let mut conv = Conversation::new();
        let turn = conv.submit("hi").unwrap();
        let msg = conv.complete(turn, Ok(ChatReply::text("hello")));
        assert!(msg.insights().is_empty());
        assert_eq!(msg.confidence(), None);
    }

    #[test]
    fn test_complete_failure_appends_error_and_keeps_user_message() {
        let mut conv = Conversation::new();
        let turn = conv.submit("Show revenue").unwrap();
        let user_id = turn.user_message_id();

        let msg = conv.complete(turn, Err(Error::status(500, "")));
        assert_eq!(msg.kind(), MessageKind::Error);
        assert!(msg.content().contains("Backend returned HTTP 500"), "got: {}", msg.content());
        assert!(!conv.is_pending());

        assert_eq!(conv.len(), 3);
        assert_eq!(conv.messages()[1].id(), user_id);
        assert_eq!(conv.messages()[1].kind(), MessageKind::User);
        assert_eq!(conv.messages()[1].content(), "Show revenue");
    }

    #[test]
    fn test_can_submit_again_after_settlement() {
        let mut conv = Conversation::new();
        let turn = conv.submit("one").unwrap();
        conv.complete(turn, Err(Error::status(401, "expired")));

        let turn = conv.submit("two").unwrap();
        conv.complete(turn, Ok(ChatReply::text("ok")));

        let kinds: Vec<_> = conv.messages().iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            [
                MessageKind::System,
                MessageKind::User,
                MessageKind::Error,
                MessageKind::User,
                MessageKind::Assistant,
            ]
        );
    }

    #[test]
    fn test_ids_unique_and_increasing() {
        let mut conv = Conversation::new();
        for i in 0..5 {
            let turn = conv.submit(&format!("q{}", i)).unwrap();
            conv.complete(turn, Ok(ChatReply::text("a")));
        }
        let ids: Vec<u64> = conv.messages().iter().map(|m| m.id()).collect();
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_session_ids_differ_per_turn() {
        let mut conv = Conversation::new();
        let first = conv.submit("a").unwrap();
        let first_id = first.session_id().to_string();
        conv.complete(first, Ok(ChatReply::text("x")));
        let second = conv.submit("b").unwrap();
        assert_ne!(first_id, second.session_id());
    }

    #[test]
    fn test_notify_does_not_touch_pending() {
        let mut conv = Conversation::new();
        let turn = conv.submit("q").unwrap();
        conv.notify("Signed in");
        assert!(conv.is_pending());
        conv.complete(turn, Ok(ChatReply::text("a")));
        assert_eq!(conv.count(MessageKind::System), 2);
        assert!(!conv.is_pending());
    }

    #[test]
    fn test_failure_text_includes_reason() {
        let text = failure_text(&Error::status(404, "no route"));
        assert_eq!(
            text,
            "Connection error: Backend returned HTTP 404 (no route). Check if the backend is running."
        );
    }
}
