//! # Application State
//!
//! Everything the chat screen shows, as plain data. The view is a pure
//! function of this struct; nothing on screen exists unless it is here.
//!
//! ```text
//! App
//! ├── transcript: Vec<Message>      // append-only conversation
//! ├── show_placeholder: bool        // one-time "no messages yet" hint
//! ├── date_header: Option<String>   // single date label above the transcript
//! ├── phase: Phase                  // Idle | Sending | Clearing
//! ├── loading: bool                 // spinner on, composer disabled
//! ├── error: Option<String>         // inline error banner (at most one)
//! ├── composer_focused: bool        // where keyboard focus sits
//! ├── theme: Theme                  // persisted color preference
//! ├── formats: TimeFormats          // clock/date display patterns
//! └── max_message_chars: usize      // outgoing length cap (0 = none)
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs,
//! which calls the small controller methods defined here.

use crate::core::format::TimeFormats;
use crate::core::message::Message;
use crate::core::prefs::Theme;

/// Where the send/response cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A chat request is in flight.
    Sending,
    /// A clear request is in flight.
    Clearing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub transcript: Vec<Message>,
    pub show_placeholder: bool,
    pub date_header: Option<String>,
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<String>,
    pub composer_focused: bool,
    pub theme: Theme,
    pub formats: TimeFormats,
    pub max_message_chars: usize,
    scroll_requested: bool,
}

impl App {
    pub fn new(theme: Theme, formats: TimeFormats, max_message_chars: usize) -> Self {
        Self {
            transcript: Vec::new(),
            show_placeholder: true,
            date_header: None,
            phase: Phase::Idle,
            loading: false,
            error: None,
            composer_focused: true,
            theme,
            formats,
            max_message_chars,
            scroll_requested: false,
        }
    }

    /// Discards all conversation state, keeping only theme and settings.
    /// The equivalent of reloading the page.
    pub fn reset(&mut self) {
        *self = App::new(self.theme, self.formats.clone(), self.max_message_chars);
        self.scroll_requested = true;
    }

    // ------------------------------------------------------------------------
    // Rendering model
    // ------------------------------------------------------------------------

    /// Appends a bubble: drops the placeholder, refreshes the date header
    /// when the message is timestamped, and asks the view to scroll down.
    pub fn add_bubble(&mut self, message: Message) {
        self.show_placeholder = false;
        if let Some(ts) = message.ts.as_deref() {
            self.ensure_date_header(ts);
        }
        self.transcript.push(message);
        self.request_scroll();
    }

    /// Writes the formatted date of `ts` into the single header slot.
    /// Unparseable timestamps leave the slot as it was.
    pub fn ensure_date_header(&mut self, ts: &str) {
        let label = self.formats.date_label(ts);
        if !label.is_empty() {
            self.date_header = Some(label);
        }
    }

    pub fn request_scroll(&mut self) {
        self.scroll_requested = true;
    }

    /// Returns whether a scroll-to-bottom was requested since the last call.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    // ------------------------------------------------------------------------
    // UI state controller
    // ------------------------------------------------------------------------

    /// Turns the loading indicator on or off; the composer is disabled while
    /// loading. Returns `false` when nothing changed, so redundant calls are free.
    pub fn set_loading(&mut self, loading: bool) -> bool {
        if self.loading == loading {
            return false;
        }
        self.loading = loading;
        true
    }

    /// The composer accepts input only while nothing is loading.
    pub fn composer_enabled(&self) -> bool {
        !self.loading
    }

    /// Shows `message` in the error banner, replacing any previous error.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
