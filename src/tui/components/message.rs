use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::format::{TimeFormats, display_text};
use crate::core::message::{Message, Role};
use crate::tui::theme::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles never grow wider than this share of the transcript.
const MAX_WIDTH_PERCENT: u16 = 80;

/// A single chat bubble.
///
/// # Design
///
/// `Bubble` is a **transient component**: it's created fresh each frame from
/// a transcript entry. User bubbles hug the right edge of their row and bot
/// bubbles the left, so the row `Rect` handed to `render` is the full
/// transcript width and the bubble places itself inside it.
///
/// Message text is passed through [`display_text`] before wrapping, so markup
/// shows up literally and control characters can't reach the terminal.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap`. Rendering uses the same pre-wrapped lines, so the
/// prediction and the output always agree.
#[derive(Clone)]
pub struct Bubble<'a> {
    pub message: &'a Message,
    /// Time label for the bubble footer; empty hides it.
    pub time_label: String,
    pub palette: Palette,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, formats: &TimeFormats, palette: Palette) -> Self {
        let time_label = message
            .ts
            .as_deref()
            .map(|ts| formats.time_label(ts))
            .unwrap_or_default();
        Self {
            message,
            time_label,
            palette,
        }
    }

    /// Height of this bubble when laid out in a row of `width` columns.
    pub fn calculate_height(&self, width: u16) -> u16 {
        match self.layout(width) {
            Some(layout) => layout.height,
            // Degenerate case: terminal too narrow for borders + padding.
            None => 1,
        }
    }

    fn role_title(&self) -> &'static str {
        match self.message.role {
            Role::User => "You",
            Role::Bot => "Support",
        }
    }

    fn style(&self) -> Style {
        match self.message.role {
            Role::User => self.palette.user,
            Role::Bot => self.palette.bot,
        }
    }

    fn layout(&self, width: u16) -> Option<BubbleLayout> {
        let max_outer = (width.saturating_mul(MAX_WIDTH_PERCENT) / 100)
            .max(HORIZONTAL_OVERHEAD + 1)
            .min(width);
        let max_content = max_outer.saturating_sub(HORIZONTAL_OVERHEAD);
        if max_content == 0 {
            return None;
        }

        let lines = wrap_lines(&self.message.text, max_content);
        let longest = lines.iter().map(|line| line.width()).max().unwrap_or(0);
        let chrome = self.role_title().width().max(self.time_label.width());
        let content_width = longest.max(chrome).min(max_content as usize) as u16;

        let line_count = lines.len().min(usize::from(u16::MAX - VERTICAL_OVERHEAD)) as u16;
        Some(BubbleLayout {
            lines,
            width: content_width + HORIZONTAL_OVERHEAD,
            height: line_count + VERTICAL_OVERHEAD,
        })
    }
}

struct BubbleLayout {
    lines: Vec<String>,
    width: u16,
    height: u16,
}

/// Wraps display-safe text the way the bubble renders it.
///
/// Always yields at least one line, so an empty message still gets a body row.
fn wrap_lines(text: &str, content_width: u16) -> Vec<String> {
    let shown = display_text(text);
    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let lines: Vec<String> = textwrap::wrap(shown.trim_end(), options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

impl Widget for Bubble<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(layout) = self.layout(area.width) else {
            return;
        };

        let x = match self.message.role {
            Role::User => area.x + area.width.saturating_sub(layout.width),
            Role::Bot => area.x,
        };
        let rect = Rect::new(x, area.y, layout.width, layout.height.min(area.height));

        let style = self.style();
        let border_style = style.add_modifier(Modifier::DIM);
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::from(self.role_title()).style(style))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if !self.time_label.is_empty() {
            block = block.title_bottom(
                Line::from(self.time_label.clone())
                    .style(self.palette.muted)
                    .right_aligned(),
            );
        }

        let inner = block.inner(rect);
        block.render(rect, buf);

        let text: Text = layout.lines.into_iter().map(Line::from).collect();
        Paragraph::new(text).style(style).render(inner, buf);
    }
}
