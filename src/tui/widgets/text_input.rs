//! Single-line text input widget with cursor and editing support

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, StatefulWidget, Widget},
};

/// State for the text input widget
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// Current text content
    pub value: String,
    /// Cursor position (character index)
    pub cursor: usize,
    /// Horizontal scroll offset
    pub scroll_offset: usize,
    /// Whether the input is focused
    pub focused: bool,
    /// Placeholder text
    pub placeholder: String,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.len();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Insert a character at cursor position
    pub fn insert(&mut self, c: char) {
        if self.cursor >= self.value.len() {
            self.value.push(c);
        } else {
            self.value.insert(self.cursor, c);
        }
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = prev_boundary(&self.value, self.cursor);
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete character at cursor (delete)
    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            let next = next_boundary(&self.value, self.cursor);
            self.value.drain(self.cursor..next);
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = prev_boundary(&self.value, self.cursor);
        }
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = next_boundary(&self.value, self.cursor);
        }
    }

    /// Move cursor to start
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end
    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Delete from cursor to end
    pub fn delete_to_end(&mut self) {
        self.value.truncate(self.cursor);
    }

    /// Clear the input
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Handle keyboard input, returns true if input was consumed
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crossterm::event::{KeyCode, KeyModifiers};

        match (key.modifiers, key.code) {
            // Navigation
            (KeyModifiers::NONE, KeyCode::Left) => self.move_left(),
            (KeyModifiers::NONE, KeyCode::Right) => self.move_right(),
            (KeyModifiers::NONE, KeyCode::Home) => self.move_home(),
            (KeyModifiers::NONE, KeyCode::End) => self.move_end(),
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => self.move_home(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => self.move_end(),

            // Deletion
            (KeyModifiers::NONE, KeyCode::Backspace) => self.backspace(),
            (KeyModifiers::NONE, KeyCode::Delete) => self.delete(),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => self.backspace(),
            (KeyModifiers::CONTROL, KeyCode::Char('k')) => self.delete_to_end(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.clear(),

            // Text input
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.insert(c),

            _ => return false,
        }
        true
    }

    /// Update scroll offset to keep cursor visible
    fn update_scroll(&mut self, visible_width: usize) {
        if visible_width == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_width {
            self.scroll_offset = self.cursor - visible_width + 1;
        }
    }
}

fn prev_boundary(s: &str, from: usize) -> usize {
    let mut idx = from.saturating_sub(1);
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn next_boundary(s: &str, from: usize) -> usize {
    let mut idx = (from + 1).min(s.len());
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Text input widget
pub struct TextInput<'a> {
    /// Block wrapper
    block: Option<Block<'a>>,
    /// Style for the input text
    style: Style,
    /// Style when focused
    focus_style: Style,
    /// Cursor style
    cursor_style: Style,
    /// Placeholder style
    placeholder_style: Style,
}

impl<'a> Default for TextInput<'a> {
    fn default() -> Self {
        Self {
            block: None,
            style: Style::default(),
            focus_style: Style::default().fg(Color::Cyan),
            cursor_style: Style::default().bg(Color::White).fg(Color::Black),
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }
}

impl<'a> TextInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn focus_style(mut self, style: Style) -> Self {
        self.focus_style = style;
        self
    }

    pub fn cursor_style(mut self, style: Style) -> Self {
        self.cursor_style = style;
        self
    }

    pub fn placeholder_style(mut self, style: Style) -> Self {
        self.placeholder_style = style;
        self
    }
}

impl<'a> StatefulWidget for TextInput<'a> {
    type State = TextInputState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner_area = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            let styled_block = if state.focused {
                block.clone().border_style(self.focus_style)
            } else {
                block.clone()
            };
            styled_block.render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.width == 0 || inner_area.height == 0 {
            return;
        }

        let visible_width = inner_area.width as usize;
        state.update_scroll(visible_width.saturating_sub(1));

        let base_style = if state.focused {
            self.focus_style
        } else {
            self.style
        };

        if state.value.is_empty() && !state.focused {
            let placeholder: String = state.placeholder.chars().take(visible_width).collect();
            buf.set_string(inner_area.x, inner_area.y, &placeholder, self.placeholder_style);
        } else {
            let visible_text: String = state
                .value
                .chars()
                .skip(state.scroll_offset)
                .take(visible_width)
                .collect();

            let cursor_pos_in_view = state.cursor.saturating_sub(state.scroll_offset);

            for (i, c) in visible_text.chars().enumerate() {
                let style = if state.focused && i == cursor_pos_in_view {
                    self.cursor_style
                } else {
                    base_style
                };
                buf.set_string(inner_area.x + i as u16, inner_area.y, c.to_string(), style);
            }

            // Cursor past the end of the value
            if state.focused
                && cursor_pos_in_view >= visible_text.len()
                && cursor_pos_in_view < visible_width
            {
                buf.set_string(
                    inner_area.x + cursor_pos_in_view as u16,
                    inner_area.y,
                    " ",
                    self.cursor_style,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_insert() {
        let mut state = TextInputState::new();
        for c in "example.com".chars() {
            state.insert(c);
        }
        assert_eq!(state.value, "example.com");
        assert_eq!(state.cursor, 11);
    }

    #[test]
    fn test_text_input_backspace() {
        let mut state = TextInputState::new().with_value("example.com");
        state.backspace();
        assert_eq!(state.value, "example.co");
        assert_eq!(state.cursor, 10);
    }

    #[test]
    fn test_text_input_cursor_movement() {
        let mut state = TextInputState::new().with_value("example.com");
        state.move_home();
        assert_eq!(state.cursor, 0);
        state.move_end();
        assert_eq!(state.cursor, 11);
        state.move_left();
        assert_eq!(state.cursor, 10);
        state.move_right();
        assert_eq!(state.cursor, 11);
    }

    #[test]
    fn test_text_input_clear_and_delete_to_end() {
        let mut state = TextInputState::new().with_value("sub.example.com");
        state.move_home();
        state.move_right();
        state.move_right();
        state.move_right();
        state.delete_to_end();
        assert_eq!(state.value, "sub");

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_is_empty_treats_whitespace_as_empty() {
        let state = TextInputState::new().with_value("   ");
        assert!(state.is_empty());
    }
}
