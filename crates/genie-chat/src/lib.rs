//! genie-chat: Conversation state for the DataGenie client
//!
//! This crate holds the conversation log and its single-flight state
//! machine, the startup connectivity check, and the [`ChatSession`]
//! controller that ties both to a [`genie_api::ChatGateway`].

pub mod connectivity;
pub mod conversation;
pub mod message;
pub mod session;
pub mod session_id;

pub use connectivity::{Connectivity, ConnectivityState};
pub use conversation::{Conversation, PendingTurn, WELCOME_MESSAGE};
pub use message::{Message, MessageKind};
pub use session::ChatSession;
pub use session_id::SessionIds;
