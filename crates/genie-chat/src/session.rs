//! Application controller owning the conversation and connectivity state

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use genie_api::{ChatGateway, ChatReply};

use crate::connectivity::{self, Connectivity, ConnectivityState};
use crate::conversation::{Conversation, PendingTurn};
use crate::message::Message;

/// Future for an in-flight chat call; owns everything it needs
pub type ReplyFuture = BoxFuture<'static, genie_api::Result<ChatReply>>;

/// Future for the startup health check
pub type HealthFuture = BoxFuture<'static, ConnectivityState>;

/// One chat session: built at startup, dropped at teardown.
///
/// Gateway calls are split into issue ([`ChatSession::dispatch`]) and settle
/// ([`ChatSession::complete`]) so a UI loop can keep handling input while a
/// call is outstanding. The returned futures never borrow the session.
pub struct ChatSession {
    gateway: Arc<dyn ChatGateway>,
    conversation: Conversation,
    connectivity: Connectivity,
}

impl ChatSession {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            conversation: Conversation::new(),
            connectivity: Connectivity::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.connectivity.state()
    }

    /// Start a turn; `None` when the single-flight or empty-text guard rejects it
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        self.conversation.submit(text)
    }

    /// Issue the gateway call for `turn`
    pub fn dispatch(&self, turn: &PendingTurn) -> ReplyFuture {
        let gateway = Arc::clone(&self.gateway);
        let text = turn.text().to_string();
        let session_id = turn.session_id().to_string();
        async move { gateway.send_message(&text, &session_id).await }.boxed()
    }

    /// Settle `turn` with the gateway outcome
    pub fn complete(&mut self, turn: PendingTurn, outcome: genie_api::Result<ChatReply>) -> &Message {
        self.conversation.complete(turn, outcome)
    }

    /// Submit, call, and settle in one go. Returns the terminal message, or
    /// `None` if the submission was rejected.
    pub async fn send(&mut self, text: &str) -> Option<&Message> {
        let turn = self.submit(text)?;
        let outcome = self.dispatch(&turn).await;
        Some(self.complete(turn, outcome))
    }

    /// Append a system notice
    pub fn notify(&mut self, text: impl Into<String>) -> &Message {
        self.conversation.notify(text)
    }

    /// Health check future for startup
    pub fn health_check(&self) -> HealthFuture {
        let gateway = Arc::clone(&self.gateway);
        async move { connectivity::check(gateway.as_ref()).await }.boxed()
    }

    /// Record the health check result; later calls are ignored
    pub fn resolve_connectivity(&mut self, state: ConnectivityState) -> bool {
        self.connectivity.resolve(state)
    }

    /// Run the health check and record its result
    pub async fn check_connectivity(&mut self) -> ConnectivityState {
        let state = self.health_check().await;
        self.resolve_connectivity(state);
        self.connectivity()
    }
}
