//! Header line: app title, connectivity dot, signed-in user

use crate::theme::Theme;
use genie_chat::ConnectivityState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct StatusLine<'a> {
    connectivity: ConnectivityState,
    user: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn new(connectivity: ConnectivityState, user: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            connectivity,
            user,
            theme,
        }
    }

    fn line(&self) -> Line<'static> {
        let user = match self.user {
            Some(name) => Span::styled(format!("  signed in as {}", name), self.theme.accent_style()),
            None => Span::styled("  not signed in", self.theme.dim_style()),
        };
        Line::from(vec![
            Span::styled(
                " DataGenie ",
                Style::default()
                    .fg(self.theme.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ ", self.theme.border_style()),
            Span::styled(
                "●",
                Style::default().fg(self.theme.connectivity_color(self.connectivity)),
            ),
            Span::styled(
                format!(" {}", self.connectivity.label()),
                self.theme.dim_style(),
            ),
            user,
        ])
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_checking_anonymous() {
        let theme = Theme::dark();
        let text = plain(&StatusLine::new(ConnectivityState::Checking, None, &theme).line());
        assert!(text.contains("Connecting..."));
        assert!(text.contains("not signed in"));
    }

    #[test]
    fn test_connected_signed_in_uses_success_color() {
        let theme = Theme::dark();
        let line = StatusLine::new(ConnectivityState::Connected, Some("demo"), &theme).line();
        assert!(plain(&line).contains("Backend Connected"));
        assert!(plain(&line).contains("signed in as demo"));
        assert_eq!(line.spans[2].style.fg, Some(theme.success));
    }
}
