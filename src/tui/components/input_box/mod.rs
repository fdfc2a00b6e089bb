//! # InputBox Component
//!
//! The message composer.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter)
//! - Refuse all input while disabled
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled`, `focused` and `palette` are props
//! synced from the application state before every event and every render.
//! Cursor position and scroll state are encapsulated in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::prefs::Theme;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, hard_wrap, inner_width, next_char_boundary,
    prev_char_boundary, sanitize_input,
};

pub const COMPOSER_TITLE: &str = "Message";
pub const COMPOSER_BUSY_TITLE: &str = "Waiting for reply…";
const COMPOSER_HINT: &str = "Type a message and press Enter";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `disabled`: a request is in flight; no editing, no submit
/// - `focused`: show the terminal cursor
/// - `palette`: colors for the current theme
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position and scroll offset (see `CursorState`)
pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    pub disabled: bool,
    pub focused: bool,
    pub palette: Palette,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: true,
            palette: Palette::for_theme(Theme::default()),
            cursor: CursorState::new(),
        }
    }

    /// Calculate required height for current buffer content, clamped to viewport limits.
    /// Returns value in range [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let rows = self.cursor.total_rows(&self.buffer, content_width);
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        if text.is_empty() {
            return None;
        }
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, visible);

        let (title, border_style) = if self.disabled {
            (COMPOSER_BUSY_TITLE, self.palette.muted)
        } else if self.focused {
            (COMPOSER_TITLE, self.palette.accent)
        } else {
            (COMPOSER_TITLE, self.palette.muted)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let text: Text = if self.buffer.is_empty() && !self.disabled {
            Text::from(Line::from(COMPOSER_HINT).style(self.palette.muted))
        } else {
            hard_wrap(&self.buffer, inner_width(area.width))
                .into_iter()
                .skip(usize::from(self.cursor.scroll_offset))
                .take(usize::from(visible))
                .map(Line::from)
                .collect()
        };

        let mut style = self.palette.base;
        if self.disabled {
            style = style.add_modifier(Modifier::DIM);
        }
        frame.render_widget(Paragraph::new(text).block(block).style(style), area);

        if self.focused && !self.disabled && area.width > 0 && area.height > 0 {
            let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                let text = sanitize_input(c.encode_utf8(&mut tmp));
                self.insert(&text)
            }
            TuiEvent::Paste(text) => {
                let text = sanitize_input(text);
                self.insert(&text)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
