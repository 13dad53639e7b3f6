//! Message list widget for displaying the conversation

use crate::theme::Theme;
use genie_chat::{Message, MessageKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Widget for displaying the conversation thread
pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
        }
    }

    /// Set scroll offset (in lines)
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

fn prefix(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::User => "▶ ",
        MessageKind::Assistant => "◀ ",
        MessageKind::System => "● ",
        MessageKind::Error => "✖ ",
    }
}

/// Lay out one message as styled lines wrapped to `width`
pub fn message_lines(msg: &Message, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let content_width = width.saturating_sub(2).max(1);

    lines.push(Line::from(vec![
        Span::styled(
            format!("{}{}", prefix(msg.kind()), msg.kind().label()),
            theme.header_style(msg.kind()),
        ),
        Span::styled(format!("  {}", msg.timestamp()), theme.dim_style()),
    ]));

    let body_style = theme.body_style(msg.kind());
    for line in textwrap::wrap(msg.content(), content_width) {
        lines.push(Line::from(Span::styled(format!("  {}", line), body_style)));
    }

    if !msg.insights().is_empty() {
        lines.push(Line::from(Span::styled(
            "  Key insights:",
            theme.insight_style().add_modifier(Modifier::BOLD),
        )));
        let options = textwrap::Options::new(content_width)
            .initial_indent("  • ")
            .subsequent_indent("    ");
        for insight in msg.insights() {
            for line in textwrap::wrap(insight, &options) {
                lines.push(Line::from(Span::styled(
                    line.into_owned(),
                    theme.insight_style(),
                )));
            }
        }
    }

    if let Some(pct) = msg.confidence_percent() {
        lines.push(Line::from(Span::styled(
            format!("  Confidence: {}%", pct),
            theme.dim_style(),
        )));
    }

    lines.push(Line::from(""));
    lines
}

/// Total rendered height of `messages` at `width`
pub fn calculate_message_height(messages: &[Message], theme: &Theme, width: usize) -> usize {
    messages
        .iter()
        .map(|m| message_lines(m, theme, width).len())
        .sum()
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let visible: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|m| message_lines(m, self.theme, width))
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genie_api::ChatReply;
    use genie_chat::Conversation;

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn answered(reply: ChatReply) -> Conversation {
        let mut conv = Conversation::new();
        let turn = conv.submit("Show revenue").unwrap();
        conv.complete(turn, Ok(reply));
        conv
    }

    #[test]
    fn test_assistant_with_insights_and_confidence() {
        let conv = answered(
            ChatReply::text("Revenue is $1M")
                .with_insights(["Q1 up 5%"])
                .with_confidence(0.9),
        );
        let lines = message_lines(conv.last().unwrap(), &Theme::dark(), 60);
        let text = text_of(&lines);

        assert!(text[0].starts_with("◀ DataGenie"));
        assert_eq!(text[1], "  Revenue is $1M");
        assert_eq!(text[2], "  Key insights:");
        assert_eq!(text[3], "  • Q1 up 5%");
        assert_eq!(text[4], "  Confidence: 90%");
        assert_eq!(text[5], "");
    }

    #[test]
    fn test_plain_assistant_has_no_extras() {
        let conv = answered(ChatReply::text("hello"));
        let text = text_of(&message_lines(conv.last().unwrap(), &Theme::dark(), 60));
        assert_eq!(text.len(), 3);
        assert!(!text.iter().any(|l| l.contains("Confidence")));
    }

    #[test]
    fn test_height_matches_lines() {
        let conv = answered(ChatReply::text("a reasonably long answer ".repeat(10)));
        let theme = Theme::dark();
        let expected: usize = conv
            .messages()
            .iter()
            .map(|m| message_lines(m, &theme, 30).len())
            .sum();
        assert_eq!(calculate_message_height(conv.messages(), &theme, 30), expected);
        assert!(expected > 6);
    }

    #[test]
    fn test_render_respects_scroll() {
        let conv = Conversation::new();
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        MessageList::new(conv.messages(), &theme)
            .scroll(1)
            .render(area, &mut buf);

        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(first_row.starts_with("  Welcome"), "got: {:?}", first_row);
    }
}
