//! /status command - show backend and conversation info

use super::{CommandContext, CommandResult};
use genie_chat::MessageKind;

pub struct StatusCommand;

impl StatusCommand {
    pub fn execute(ctx: &CommandContext<'_>) -> CommandResult {
        let conversation = ctx.session.conversation();

        let mut output = String::from("Status\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');

        output.push_str(&format!("Backend:    {}\n", ctx.base_url));
        output.push_str(&format!("State:      {}\n", ctx.session.connectivity().label()));
        output.push_str(&format!(
            "User:       {}\n",
            ctx.user.unwrap_or("anonymous")
        ));
        output.push('\n');

        output.push_str(&format!("Messages:   {} total\n", conversation.len()));
        output.push_str(&format!(
            "            {} you, {} DataGenie, {} errors\n",
            conversation.count(MessageKind::User),
            conversation.count(MessageKind::Assistant),
            conversation.count(MessageKind::Error)
        ));

        if ctx.session.is_pending() {
            output.push_str("\nWaiting for a reply...\n");
        }

        CommandResult::Message(output)
    }
}
