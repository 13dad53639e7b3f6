//! Slash commands for interactive mode
//!
//! Commands are handled locally and never reach the backend.

mod status;

pub use status::StatusCommand;

use genie_chat::ChatSession;

/// Result of executing a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Show a message to the user (not sent to the backend)
    Message(String),
    /// Forget the stored session
    SignOut,
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// What a command may look at
pub struct CommandContext<'a> {
    pub session: &'a ChatSession,
    pub base_url: &'a str,
    /// Display name of the signed-in user
    pub user: Option<&'a str>,
}

/// Parse and execute a slash command; `None` if `input` isn't one
pub fn execute_command(input: &str, ctx: &CommandContext<'_>) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let command = rest.split_whitespace().next().unwrap_or("").to_lowercase();

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "status" | "s" => StatusCommand::execute(ctx),

        "whoami" => CommandResult::Message(match ctx.user {
            Some(name) => format!("Signed in as {}", name),
            None => "Not signed in. Run `genie --login <email>` to sign in.".to_string(),
        }),

        "signout" | "logout" => CommandResult::SignOut,

        "quit" | "exit" | "q" => CommandResult::Exit,

        _ => CommandResult::Unknown(command),
    })
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?        Show this help message
  /status, /s          Show backend and conversation status
  /whoami              Show who requests are sent as
  /signout             Forget the stored session
  /quit, /exit, /q     Exit genie

Anything else is sent to DataGenie, for example:
  What were our top products last quarter?
  Show revenue trends by region"#
        .to_string()
}
