//! # MessageList Component
//!
//! Scrollable view of the conversation transcript.
//!
//! ## Responsibilities
//!
//! - Display the placeholder while the conversation is empty
//! - Lay out bubbles top to bottom in arrival order
//! - Manage scrolling, including staying pinned to the newest bubble
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a App` (props).
//! Since `Component::render` takes `&mut self`, we can safely mutate the scroll
//! state during the render pass, aligning with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::App;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Bubble;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

pub const PLACEHOLDER_TEXT: &str = "No messages yet. Ask a question to get started.";

/// Blank rows between consecutive bubbles.
const BUBBLE_GAP: u16 = 1;

/// Scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Total canvas height from the last render
    pub content_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Re-attach to the bottom; the next render scrolls to the newest bubble.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub app: &'a App,
    pub palette: Palette,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, app: &'a App, palette: Palette) -> Self {
        Self {
            state,
            app,
            palette,
        }
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        let placeholder = Paragraph::new(Line::from(PLACEHOLDER_TEXT))
            .style(self.palette.muted)
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, row);
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.app.show_placeholder {
            self.state.content_height = 0;
            self.state.viewport_height = area.height;
            self.render_placeholder(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Measure
        let bubbles: Vec<(Bubble, u16)> = self
            .app
            .transcript
            .iter()
            .map(|message| {
                let bubble = Bubble::new(message, &self.app.formats, self.palette);
                let height = bubble.calculate_height(content_width);
                (bubble, height)
            })
            .collect();

        let gaps = (bubbles.len().saturating_sub(1) as u16).saturating_mul(BUBBLE_GAP);
        let total_height = bubbles
            .iter()
            .fold(gaps, |acc, (_, height)| acc.saturating_add(*height));

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // 3. Render bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (bubble, height) in bubbles {
            scroll_view.render_widget(bubble, Rect::new(0, y_offset, content_width, height));
            y_offset = y_offset.saturating_add(height).saturating_add(BUBBLE_GAP);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is recreated
/// each frame and can't hold the scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                // A pinned offset may still sit past the end; start from the real bottom
                self.clamp_scroll();
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.clamp_scroll();
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}
