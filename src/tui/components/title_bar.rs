//! # TitleBar Component
//!
//! Top status bar.
//!
//! ## Responsibilities
//!
//! - Show the application name and the conversation's date header
//! - Show the loading indicator while a request is in flight
//! - Show the active theme
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state. Rendering the same props twice produces the same row,
//! which is what keeps repeated `set_loading(true)` calls invisible.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::prefs::Theme;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub const APP_TITLE: &str = "Support Chat";
pub const LOADING_TEXT: &str = "Thinking…";

pub struct TitleBar<'a> {
    /// Current date header label, if any
    pub date_header: Option<&'a str>,
    pub loading: bool,
    pub theme: Theme,
    pub palette: Palette,
}

impl<'a> TitleBar<'a> {
    pub fn new(date_header: Option<&'a str>, loading: bool, theme: Theme, palette: Palette) -> Self {
        Self {
            date_header,
            loading,
            theme,
            palette,
        }
    }

    fn left(&self) -> Line<'a> {
        let mut spans = vec![Span::styled(
            APP_TITLE,
            self.palette.accent.add_modifier(Modifier::BOLD),
        )];
        if let Some(date) = self.date_header {
            spans.push(Span::styled(" · ", self.palette.muted));
            spans.push(Span::raw(date));
        }
        Line::from(spans)
    }

    fn right(&self) -> Line<'a> {
        let mut spans = Vec::new();
        if self.loading {
            spans.push(Span::styled(
                LOADING_TEXT,
                self.palette.accent.add_modifier(Modifier::ITALIC),
            ));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("[{}]", self.theme.label()),
            self.palette.muted,
        ));
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.left()), area);
        frame.render_widget(
            Paragraph::new(self.right()).alignment(Alignment::Right),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn row(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                title_bar.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_title_and_theme() {
        let palette = Palette::for_theme(Theme::Dark);
        let text = row(&mut TitleBar::new(None, false, Theme::Dark, palette));
        assert!(text.contains(APP_TITLE));
        assert!(text.contains("[dark]"));
        assert!(!text.contains(LOADING_TEXT));
    }

    #[test]
    fn shows_date_header_and_loading() {
        let palette = Palette::for_theme(Theme::Light);
        let text = row(&mut TitleBar::new(
            Some("Monday, Jan 01, 2024"),
            true,
            Theme::Light,
            palette,
        ));
        assert!(text.contains("Monday, Jan 01, 2024"));
        assert!(text.contains(LOADING_TEXT));
    }
}
