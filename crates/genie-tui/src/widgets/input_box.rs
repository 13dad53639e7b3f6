//! Query input widget

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Single-line text input.
///
/// Editing keeps working while locked; locking only changes how the box is
/// drawn and what `placeholder` is shown. Whether a submit is accepted is
/// decided by the conversation, not here.
#[derive(Debug, Default)]
pub struct InputBox {
    /// Current input text
    content: String,
    /// Cursor position (character index, not byte index)
    cursor: usize,
    /// Horizontal scroll offset (in display width)
    scroll: usize,
    placeholder: String,
    locked_placeholder: String,
    locked: bool,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder shown when empty and unlocked
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Placeholder shown when empty and locked
    pub fn with_locked_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.locked_placeholder = placeholder.into();
        self
    }

    /// Dim the box while a request is outstanding
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of the character at `index`
    fn byte_offset(&self, index: usize) -> usize {
        self.content
            .char_indices()
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Display width of the text before the cursor
    fn cursor_display_width(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Remove characters in `[from, to)` (character indices)
    fn remove_range(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to);
        self.content.drain(start..end);
    }

    /// Handle an editing action; returns whether anything changed
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        let char_count = self.char_count();

        let changed = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace if self.cursor > 0 => {
                self.remove_range(self.cursor - 1, self.cursor);
                self.cursor -= 1;
                true
            }
            Action::Delete if self.cursor < char_count => {
                self.remove_range(self.cursor, self.cursor + 1);
                true
            }
            Action::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            }
            Action::Right if self.cursor < char_count => {
                self.cursor += 1;
                true
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = char_count;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                self.remove_range(start, self.cursor);
                self.cursor = start;
                true
            }
            Action::Paste(text) => {
                for c in text.chars() {
                    // Single-line input: fold newlines into one space
                    if c == '\n' || c == '\r' {
                        if self.cursor > 0 && !self.content.ends_with(' ') {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };

        if changed {
            self.update_scroll(width as usize);
        }
        changed
    }

    fn update_scroll(&mut self, width: usize) {
        let visible_width = width.saturating_sub(4).max(1);
        let cursor_pos = self.cursor_display_width();

        if cursor_pos < self.scroll {
            self.scroll = cursor_pos;
        } else if cursor_pos >= self.scroll + visible_width {
            self.scroll = cursor_pos - visible_width + 1;
        }
    }

    /// Characters visible after horizontal scroll, fitting `width` columns
    fn visible_text(&self, width: usize) -> String {
        let mut skipped = 0;
        let mut used = 0;
        let mut visible = String::new();
        for c in self.content.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if used + w > width {
                break;
            }
            visible.push(c);
            used += w;
        }
        visible
    }

    /// Render the input box
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.locked {
                theme.border_style()
            } else {
                theme.accent_style()
            });

        let inner = block.inner(area);
        block.render(area, buf);

        let (text, style) = if self.content.is_empty() {
            let placeholder = if self.locked {
                &self.locked_placeholder
            } else {
                &self.placeholder
            };
            (placeholder.clone(), theme.dim_style())
        } else if self.locked {
            (self.visible_text(inner.width as usize), theme.dim_style())
        } else {
            (self.visible_text(inner.width as usize), theme.base_style())
        };

        Paragraph::new(text).style(style).render(inner, buf);

        if !self.locked && inner.width > 0 {
            let cursor_x = self.cursor_display_width().saturating_sub(self.scroll);
            if cursor_x < inner.width as usize {
                let x = inner.x + cursor_x as u16;
                if let Some(cell) = buf.cell_mut((x, inner.y)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_action(&Action::Char(c), 80);
        }
        input
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("revenue");
        input.handle_action(&Action::Backspace, 80);
        assert_eq!(input.content(), "revenu");
    }

    #[test]
    fn test_insert_in_middle_of_multibyte_text() {
        let mut input = typed("añb");
        input.handle_action(&Action::Left, 80);
        input.handle_action(&Action::Char('x'), 80);
        assert_eq!(input.content(), "añxb");
        input.handle_action(&Action::Home, 80);
        input.handle_action(&Action::Delete, 80);
        assert_eq!(input.content(), "ñxb");
    }

    #[test]
    fn test_delete_word() {
        let mut input = typed("show total revenue  ");
        input.handle_action(&Action::DeleteWord, 80);
        assert_eq!(input.content(), "show total ");
    }

    #[test]
    fn test_paste_folds_newlines() {
        let mut input = typed("a");
        input.handle_action(&Action::Paste("b\r\nc".into()), 80);
        assert_eq!(input.content(), "ab c");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputBox::new();
        assert!(!input.handle_action(&Action::Backspace, 80));
    }

    #[test]
    fn test_visible_text_scrolls_with_cursor() {
        let input = typed("abcdefghij");
        // width 8 leaves 4 visible columns, cursor at the end
        let mut narrow = InputBox::new();
        for c in "abcdefghij".chars() {
            narrow.handle_action(&Action::Char(c), 8);
        }
        assert_eq!(input.visible_text(80), "abcdefghij");
        assert!(narrow.visible_text(4).ends_with('j'));
    }

    #[test]
    fn test_clear_line() {
        let mut input = typed("hello");
        input.handle_action(&Action::ClearLine, 80);
        assert_eq!(input.content(), "");
    }
}
