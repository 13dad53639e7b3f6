//! Line-oriented interactive mode (`--no-tui`)

use std::io::{self, IsTerminal, Write};

use genie_chat::session::HealthFuture;
use genie_chat::{ChatSession, Message};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::commands::{CommandContext, CommandResult, execute_command};
use crate::ui::settle;

/// Write a message body followed by its insights and confidence
pub fn write_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    writeln!(out, "{}", message.content())?;

    if !message.insights().is_empty() {
        writeln!(out)?;
        writeln!(out, "Key insights:")?;
        for insight in message.insights() {
            writeln!(out, "  • {}", insight)?;
        }
    }

    if let Some(percent) = message.confidence_percent() {
        writeln!(out, "Confidence: {}%", percent)?;
    }
    Ok(())
}

/// Run line mode on stdin/stdout
pub async fn run_interactive(
    mut session: ChatSession,
    base_url: &str,
    user: Option<&str>,
) -> anyhow::Result<()> {
    // Show minimal startup info (only if TTY)
    if io::stderr().is_terminal() {
        eprintln!("genie ({}) {}", base_url, session.connectivity().label());
        if let Some(name) = user {
            eprintln!("Signed in as {}", name);
        }
        if let Some(welcome) = session.messages().first() {
            eprintln!();
            eprintln!("{}", welcome.content());
        }
        eprintln!();
    }

    let stdin = BufReader::new(tokio::io::stdin());
    run_lines(&mut session, stdin, &mut io::stdout(), base_url, user).await
}

/// Read lines from `input` until EOF or `/quit`.
///
/// The health check runs alongside reading input and is reported when it
/// settles; a slow or silent `/health` never holds up a chat call.
pub async fn run_lines<R, W>(
    session: &mut ChatSession,
    input: R,
    out: &mut W,
    base_url: &str,
    user: Option<&str>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut health: Option<HealthFuture> = Some(session.health_check());
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = loop {
            tokio::select! {
                state = settle(&mut health) => {
                    session.resolve_connectivity(state);
                    writeln!(out, "\r[{}]", state.label())?;
                    write!(out, "> ")?;
                    out.flush()?;
                }
                line = lines.next_line() => break line?,
            }
        };

        // EOF
        let Some(line) = line else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let ctx = CommandContext {
            session: &*session,
            base_url,
            user,
        };
        if let Some(result) = execute_command(&line, &ctx) {
            match result {
                CommandResult::Message(msg) => writeln!(out, "{}", msg)?,
                CommandResult::SignOut => match crate::auth::logout() {
                    Ok(()) => writeln!(out, "Signed out. Restart genie to continue anonymously.")?,
                    Err(e) => writeln!(out, "{}", e)?,
                },
                CommandResult::Exit => break,
                CommandResult::Unknown(cmd) => {
                    writeln!(out, "Unknown command: /{}", cmd)?;
                    writeln!(out, "Type /help for available commands.")?;
                }
            }
            continue;
        }

        // Sent as typed; only the line terminator is gone
        if let Some(message) = session.send(&line).await {
            writeln!(out)?;
            write_message(out, message)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
