//! Color theme support

use genie_chat::{ConnectivityState, MessageKind};
use ratatui::style::{Color, Modifier, Style};

/// Color theme for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (user messages, prompt)
    pub accent: Color,
    /// Assistant messages
    pub assistant: Color,
    /// Insight bullets
    pub insight: Color,
    /// Error color
    pub error: Color,
    /// Success color
    pub success: Color,
    /// Warning color
    pub warning: Color,
    /// Border color
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::LightBlue,
            assistant: Color::Cyan,
            insight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            assistant: Color::Rgb(0, 110, 140),
            insight: Color::Rgb(180, 120, 0),
            error: Color::Red,
            success: Color::Green,
            warning: Color::Rgb(180, 120, 0),
            border: Color::Gray,
        }
    }

    /// Pick a theme by name, falling back to dark
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn insight_style(&self) -> Style {
        Style::default().fg(self.insight)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Header style for a message of the given kind
    pub fn header_style(&self, kind: MessageKind) -> Style {
        let color = match kind {
            MessageKind::User => self.accent,
            MessageKind::Assistant => self.assistant,
            MessageKind::System => self.dim,
            MessageKind::Error => self.error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Body style for a message of the given kind
    pub fn body_style(&self, kind: MessageKind) -> Style {
        match kind {
            MessageKind::Error => self.error_style(),
            MessageKind::System => self.dim_style(),
            MessageKind::User | MessageKind::Assistant => self.base_style(),
        }
    }

    /// Dot color for the connectivity indicator
    pub fn connectivity_color(&self, state: ConnectivityState) -> Color {
        match state {
            ConnectivityState::Checking => self.warning,
            ConnectivityState::Connected => self.success,
            ConnectivityState::Error => self.error,
        }
    }
}
