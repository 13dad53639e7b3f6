//! TUI implementation for genie

use std::future::Future;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, MouseEventKind};
use futures::StreamExt;
use genie_api::ChatReply;
use genie_chat::session::{HealthFuture, ReplyFuture};
use genie_chat::{ChatSession, ConnectivityState, PendingTurn};
use genie_tui::{
    Theme, Tui,
    input::{Action, event_to_action},
    widgets::{InputBox, MessageList, Spinner, StatusLine, message_list::calculate_message_height},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::commands::{CommandContext, CommandResult, execute_command};

/// What the event loop should do after an input action
#[derive(Debug)]
pub enum Flow {
    Continue,
    /// A turn was accepted; issue its chat call
    Send(PendingTurn),
    Quit,
}

/// TUI application state
pub struct TuiState {
    session: ChatSession,
    input: InputBox,
    /// Scroll offset in lines; `usize::MAX` pins to the bottom
    scroll: usize,
    theme: Theme,
    base_url: String,
    /// Display name of the signed-in user
    user: Option<String>,
    /// Spinner start time for animation
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(session: ChatSession, base_url: String, user: Option<String>, theme: Theme) -> Self {
        let input = InputBox::new()
            .with_placeholder("Ask me anything about your data...")
            .with_locked_placeholder("Waiting for DataGenie...");

        Self {
            session,
            input,
            scroll: usize::MAX,
            theme,
            base_url,
            user,
            spinner_start: Instant::now(),
        }
    }

    fn scroll_to_bottom(&mut self) {
        // Resolved against content height during render
        self.scroll = usize::MAX;
    }

    pub fn notify(&mut self, content: &str) {
        self.session.notify(content);
        self.scroll_to_bottom();
    }

    /// Handle keyboard action
    pub fn handle_action(&mut self, action: Action, width: u16) -> Flow {
        match action {
            Action::Submit => self.submit(),
            action if action.is_exit() => Flow::Quit,
            Action::Escape => {
                self.input.clear();
                Flow::Continue
            }
            Action::PageUp => {
                self.scroll_up(10);
                Flow::Continue
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                Flow::Continue
            }
            other => {
                self.input.handle_action(&other, width);
                Flow::Continue
            }
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn submit(&mut self) -> Flow {
        let content = self.input.content().to_string();
        if content.trim().is_empty() {
            return Flow::Continue;
        }

        let ctx = CommandContext {
            session: &self.session,
            base_url: &self.base_url,
            user: self.user.as_deref(),
        };
        if let Some(result) = execute_command(&content, &ctx) {
            self.input.clear();
            return self.apply_command(result);
        }

        // Rejected while a reply is outstanding; the text stays in the box
        let Some(turn) = self.session.submit(&content) else {
            return Flow::Continue;
        };

        self.input.clear();
        self.spinner_start = Instant::now();
        self.scroll_to_bottom();
        Flow::Send(turn)
    }

    fn apply_command(&mut self, result: CommandResult) -> Flow {
        match result {
            CommandResult::Message(msg) => self.notify(&msg),
            CommandResult::SignOut => {
                let msg = match crate::auth::logout() {
                    Ok(()) if std::env::var(crate::auth::TOKEN_ENV).is_ok_and(|t| !t.is_empty()) => format!(
                        "Stored session removed. {} is still set and will be used.",
                        crate::auth::TOKEN_ENV
                    ),
                    Ok(()) => {
                        self.user = None;
                        "Signed out. Requests are now sent anonymously.".to_string()
                    }
                    Err(e) => e,
                };
                self.notify(&msg);
            }
            CommandResult::Exit => return Flow::Quit,
            CommandResult::Unknown(cmd) => self.notify(&format!(
                "Unknown command: /{}\nType /help for available commands.",
                cmd
            )),
        }
        Flow::Continue
    }

    /// Settle the outstanding turn
    pub fn complete(&mut self, turn: PendingTurn, outcome: genie_api::Result<ChatReply>) {
        self.session.complete(turn, outcome);
        self.scroll_to_bottom();
    }

    pub fn resolve_connectivity(&mut self, state: ConnectivityState) {
        self.session.resolve_connectivity(state);
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.input.set_locked(self.session.is_pending());

        // Layout: status (1), messages (flex), activity (1), input (3)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(frame.area());

        frame.render_widget(
            StatusLine::new(self.session.connectivity(), self.user.as_deref(), &self.theme),
            chunks[0],
        );
        self.render_messages(frame, chunks[1]);
        self.render_activity(frame, chunks[2]);
        self.input
            .render(chunks[3], frame.buffer_mut(), &self.theme);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(" Chat ");

        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        // Leave a column for the scrollbar
        let width = inner.width.saturating_sub(1) as usize;
        let messages = self.session.messages();
        let content_height = calculate_message_height(messages, &self.theme, width);
        let max_scroll = content_height.saturating_sub(inner.height as usize);

        if self.scroll == usize::MAX {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }

        let list_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };
        let message_list = MessageList::new(messages, &self.theme).scroll(self.scroll);
        frame.render_widget(message_list, list_area);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        if self.session.is_pending() {
            let spinner = Spinner::new("DataGenie is thinking...", &self.theme, self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let line = Line::from(Span::styled(
            " Enter: send │ PgUp/PgDn: scroll │ /help: commands │ Ctrl+C: quit",
            self.theme.dim_style(),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Await the future in `slot`, clearing it once it resolves. Never resolves
/// while the slot is empty.
pub(crate) async fn settle<F: Future + Unpin>(slot: &mut Option<F>) -> F::Output {
    match slot.as_mut() {
        Some(fut) => {
            let output = fut.await;
            *slot = None;
            output
        }
        None => std::future::pending().await,
    }
}

enum LoopEvent {
    Reply(genie_api::Result<ChatReply>),
    Health(ConnectivityState),
    Terminal(Option<std::io::Result<Event>>),
    Tick,
}

/// Run the TUI application
pub async fn run_tui(mut state: TuiState) -> anyhow::Result<()> {
    let mut tui = Tui::new()?;
    let mut event_stream = EventStream::new();

    // Tick interval for animations (80ms for smooth spinner)
    let mut tick_interval = tokio::time::interval(Duration::from_millis(80));

    let mut health: Option<HealthFuture> = Some(state.session.health_check());
    let mut reply: Option<ReplyFuture> = None;
    let mut in_flight: Option<PendingTurn> = None;

    loop {
        tui.draw(|frame| state.render(frame))?;
        let width = tui.width()?;

        let event = tokio::select! {
            outcome = settle(&mut reply) => LoopEvent::Reply(outcome),
            connectivity = settle(&mut health) => LoopEvent::Health(connectivity),
            event = event_stream.next() => LoopEvent::Terminal(event),
            _ = tick_interval.tick() => LoopEvent::Tick,
        };

        match event {
            LoopEvent::Reply(outcome) => {
                if let Some(turn) = in_flight.take() {
                    state.complete(turn, outcome);
                }
            }
            LoopEvent::Health(connectivity) => state.resolve_connectivity(connectivity),
            LoopEvent::Terminal(Some(Ok(Event::Mouse(mouse)))) => match mouse.kind {
                MouseEventKind::ScrollUp => state.scroll_up(3),
                MouseEventKind::ScrollDown => state.scroll = state.scroll.saturating_add(3),
                _ => {}
            },
            LoopEvent::Terminal(Some(Ok(event))) => {
                let Some(action) = event_to_action(event) else {
                    continue;
                };
                match state.handle_action(action, width) {
                    Flow::Continue => {}
                    Flow::Send(turn) => {
                        reply = Some(state.session.dispatch(&turn));
                        in_flight = Some(turn);
                    }
                    Flow::Quit => break,
                }
            }
            LoopEvent::Tick => {}
            LoopEvent::Terminal(Some(Err(e))) => {
                return Err(anyhow::anyhow!("Event error: {}", e));
            }
            LoopEvent::Terminal(None) => break,
        }
    }

    if in_flight.is_some() {
        tracing::debug!("Exiting with a chat request still outstanding");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use genie_api::{ChatGateway, Result};
    use genie_chat::MessageKind;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl ChatGateway for Echo {
        async fn check_health(&self) -> Result<serde_json::Value> {
            Ok(serde_json::json!({ "status": "ok" }))
        }

        async fn send_message(&self, text: &str, _session_id: &str) -> Result<ChatReply> {
            Ok(ChatReply::text(format!("echo: {}", text)))
        }
    }

    fn state() -> TuiState {
        let session = ChatSession::new(Arc::new(Echo));
        TuiState::new(session, "http://localhost:3001/api".into(), None, Theme::dark())
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            state.handle_action(Action::Char(c), 80);
        }
    }

    #[tokio::test]
    async fn test_submit_clears_input_and_dispatches() {
        let mut state = state();
        type_text(&mut state, "Show revenue");

        let Flow::Send(turn) = state.handle_action(Action::Submit, 80) else {
            panic!("expected a turn");
        };
        assert_eq!(turn.text(), "Show revenue");
        assert_eq!(state.input.content(), "");
        assert!(state.session.is_pending());

        let outcome = state.session.dispatch(&turn).await;
        state.complete(turn, outcome);
        assert!(!state.session.is_pending());
        let last = state.session.messages().last().unwrap();
        assert_eq!(last.kind(), MessageKind::Assistant);
        assert_eq!(last.content(), "echo: Show revenue");
    }

    #[test]
    fn test_submit_while_pending_keeps_text() {
        let mut state = state();
        type_text(&mut state, "first");
        let Flow::Send(_turn) = state.handle_action(Action::Submit, 80) else {
            panic!("expected a turn");
        };

        type_text(&mut state, "second");
        assert!(matches!(state.handle_action(Action::Submit, 80), Flow::Continue));
        assert_eq!(state.input.content(), "second");
        assert_eq!(state.session.conversation().count(MessageKind::User), 1);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = state();
        type_text(&mut state, "   ");
        assert!(matches!(state.handle_action(Action::Submit, 80), Flow::Continue));
        assert_eq!(state.session.messages().len(), 1);
    }

    #[test]
    fn test_slash_command_stays_local() {
        let mut state = state();
        type_text(&mut state, "/help");
        assert!(matches!(state.handle_action(Action::Submit, 80), Flow::Continue));
        assert_eq!(state.input.content(), "");
        assert_eq!(state.session.conversation().count(MessageKind::User), 0);
        assert_eq!(state.session.conversation().count(MessageKind::System), 2);

        type_text(&mut state, "/quit");
        assert!(matches!(state.handle_action(Action::Submit, 80), Flow::Quit));
    }

    #[test]
    fn test_interrupt_quits() {
        let mut state = state();
        assert!(matches!(state.handle_action(Action::Interrupt, 80), Flow::Quit));
    }

    #[tokio::test]
    async fn test_settle_clears_slot() {
        let mut slot: Option<HealthFuture> = Some(Box::pin(async { ConnectivityState::Connected }));
        assert_eq!(settle(&mut slot).await, ConnectivityState::Connected);
        assert!(slot.is_none());
    }
}
