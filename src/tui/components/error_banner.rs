//! Inline error banner shown between the transcript and the composer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::format::display_text;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Border (2) + padding (2)
const HORIZONTAL_OVERHEAD: u16 = 4;
const VERTICAL_OVERHEAD: u16 = 2;
const MAX_LINES: u16 = 3;

pub struct ErrorBanner<'a> {
    pub message: &'a str,
    pub palette: Palette,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str, palette: Palette) -> Self {
        Self { message, palette }
    }

    /// Rows needed for `message` at `width`, capped at three lines of text.
    pub fn calculate_height(message: &str, width: u16) -> u16 {
        let lines = wrap(message, width).len().clamp(1, usize::from(MAX_LINES)) as u16;
        lines + VERTICAL_OVERHEAD
    }
}

fn wrap(message: &str, width: u16) -> Vec<String> {
    let content_width = usize::from(width.saturating_sub(HORIZONTAL_OVERHEAD)).max(1);
    let options = textwrap::Options::new(content_width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(display_text(message).trim(), options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

impl Component for ErrorBanner<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.error)
            .title(Line::from("Error").style(self.palette.error))
            .padding(Padding::horizontal(1));

        let text: Text = wrap(self.message, area.width)
            .into_iter()
            .take(usize::from(MAX_LINES))
            .map(Line::from)
            .collect();
        frame.render_widget(
            Paragraph::new(text).block(block).style(self.palette.error),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prefs::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn height_is_one_line_for_short_messages() {
        assert_eq!(ErrorBanner::calculate_height("Request failed (500)", 80), 3);
    }

    #[test]
    fn height_is_capped() {
        let long = "word ".repeat(200);
        assert_eq!(ErrorBanner::calculate_height(&long, 40), MAX_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn renders_message() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut banner = ErrorBanner::new(
                    "Request timed out. Please try again.",
                    Palette::for_theme(Theme::Light),
                );
                let area = f.area();
                banner.render(f, area);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Error"));
        assert!(text.contains("Request timed out. Please try again."));
    }
}
