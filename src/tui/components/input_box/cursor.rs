//! Cursor position tracking for the InputBox.
//!
//! `CursorState` owns the cursor byte offset and scroll offset. Methods take
//! `buffer: &str` explicitly because the text itself is owned by `InputBox`.

use super::text_wrap::{CONTENT_OFFSET, hard_wrap, inner_width};
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped row (0 when content fits in the viewport)
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    /// Reset cursor to start (used after Submit clears the buffer).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped (row, column) of the cursor for a box `content_width` wide.
    pub fn row_col(&self, buffer: &str, content_width: u16) -> (u16, u16) {
        let width = inner_width(content_width);
        let rows = hard_wrap(&buffer[..self.pos], width);
        let row = rows.len().saturating_sub(1);
        let col = rows.last().map(|r| r.width()).unwrap_or(0);

        // A full row pushes the cursor onto the next one
        let (row, col) = if width > 0 && col >= usize::from(width) {
            (row + 1, 0)
        } else {
            (row, col)
        };
        (clamp_u16(row), clamp_u16(col))
    }

    /// Total wrapped rows, counting a row the cursor may occupy past the text.
    pub fn total_rows(&self, buffer: &str, content_width: u16) -> u16 {
        let text_rows = clamp_u16(hard_wrap(buffer, inner_width(content_width)).len());
        let (cursor_row, _) = self.row_col(buffer, content_width);
        text_rows.max(cursor_row + 1)
    }

    /// Keep the cursor row inside a window of `visible` rows.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16, visible: u16) {
        let visible = visible.max(1);
        let (row, _) = self.row_col(buffer, content_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible {
            self.scroll_offset = row + 1 - visible;
        }
    }

    /// Absolute terminal position of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = self.row_col(buffer, area.width);
        let x = area.x + CONTENT_OFFSET + col;
        let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
        (
            x.min(area.right().saturating_sub(1)),
            y.min(area.bottom().saturating_sub(1)),
        )
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    // content width 14 → inner width 10

    #[test]
    fn cursor_at_start() {
        let cursor = CursorState::new();
        assert_eq!(cursor.row_col("hello", 14), (0, 0));
    }

    #[test]
    fn cursor_after_text() {
        let mut cursor = CursorState::new();
        cursor.pos = 5;
        assert_eq!(cursor.row_col("hello", 14), (0, 5));
    }

    #[test]
    fn cursor_after_newline() {
        let buffer = "ab\n";
        let mut cursor = CursorState::new();
        cursor.pos = buffer.len();
        assert_eq!(cursor.row_col(buffer, 14), (1, 0));
        assert_eq!(cursor.total_rows(buffer, 14), 2);
    }

    #[test]
    fn full_row_moves_cursor_down() {
        let buffer = "abcdefghij";
        let mut cursor = CursorState::new();
        cursor.pos = buffer.len();
        assert_eq!(cursor.row_col(buffer, 14), (1, 0));
        assert_eq!(cursor.total_rows(buffer, 14), 2);
    }

    #[test]
    fn scroll_follows_cursor() {
        let buffer = "1\n2\n3\n4\n5\n6\n7";
        let mut cursor = CursorState::new();
        cursor.pos = buffer.len();
        cursor.update_scroll_offset(buffer, 14, 5);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.update_scroll_offset(buffer, 14, 5);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_accounts_for_border_and_padding() {
        let mut cursor = CursorState::new();
        cursor.pos = 3;
        let area = Rect::new(0, 10, 14, 3);
        assert_eq!(cursor.screen_pos("abc", area), (5, 11));
    }
}
