//! Animated "thinking" spinner shown while a chat call is pending

use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};
use std::time::{Duration, Instant};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Frame to show after `elapsed`
pub fn frame_at(elapsed: Duration) -> &'static str {
    let index = (elapsed.as_millis() / FRAME_DURATION.as_millis()) as usize;
    FRAMES[index % FRAMES.len()]
}

pub struct Spinner<'a> {
    label: &'a str,
    theme: &'a Theme,
    started: Instant,
}

impl<'a> Spinner<'a> {
    /// `started` anchors the animation so redraws stay in phase
    pub fn new(label: &'a str, theme: &'a Theme, started: Instant) -> Self {
        Self {
            label,
            theme,
            started,
        }
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 {
            return;
        }
        let text = format!("{} {}", frame_at(self.started.elapsed()), self.label);
        let span = Span::styled(text, self.theme.accent_style());
        buf.set_span(area.x, area.y, &span, area.width);
    }
}
