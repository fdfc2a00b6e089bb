//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread owns `App`. Terminal events and finished network requests
//! both become `Action`s applied through `update()`. Requests run as tokio
//! tasks and report back over an `mpsc` channel, which the loop drains
//! between frames. The returned `Effect` is the only way the core asks for
//! side effects.
//!
//! ## Redraw Strategy
//!
//! Nothing on screen animates, so the loop sleeps up to 250ms per poll and
//! only redraws after an event, a completed request, or a resize.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ChatBackend, HttpChatClient};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::prefs::{self, Theme};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Palette;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }

    /// Push App-derived props into the components.
    pub fn sync(&mut self, app: &App) {
        self.input_box.disabled = !app.composer_enabled();
        self.input_box.focused = app.composer_focused;
        self.input_box.palette = Palette::for_theme(app.theme);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Carries out the `Effect`s returned by `update()`.
struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::Sender<Action>,
    prefs_path: Option<PathBuf>,
}

impl Dispatcher {
    /// Applies `action` and performs its effect. Returns `true` to quit.
    fn apply(&self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        debug!("Applying {:?}", action);
        let effect = update(app, action);
        let quit = match effect {
            Effect::None => false,
            Effect::Quit => true,
            Effect::SendMessage(message) => {
                spawn_send(Arc::clone(&self.backend), message, self.tx.clone());
                false
            }
            Effect::ClearHistory => {
                spawn_clear(Arc::clone(&self.backend), self.tx.clone());
                false
            }
            Effect::PersistTheme(theme) => {
                persist_theme(self.prefs_path.as_deref(), theme);
                false
            }
            Effect::Reload => {
                *tui = TuiState::new();
                false
            }
        };

        if app.take_scroll_request() {
            tui.message_list.scroll_to_bottom();
        }
        tui.sync(app);
        quit
    }
}

/// Maps a terminal event to a core action, letting components consume
/// the events they own.
fn route_event(event: &TuiEvent, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::ForceQuit | TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::ClearHistory => Some(Action::Clear),
        TuiEvent::ToggleTheme => Some(Action::ToggleTheme),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        // End with nothing typed jumps back to the newest bubble
        TuiEvent::CursorEnd if tui.input_box.buffer.is_empty() => {
            tui.message_list.scroll_to_bottom();
            None
        }
        _ => match tui.input_box.handle_event(event)? {
            InputEvent::Submit(text) => Some(Action::Submit(text)),
            InputEvent::ContentChanged => None,
        },
    }
}

fn spawn_send(backend: Arc<dyn ChatBackend>, message: String, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let result = backend.send_message(&message).await;
        if tx.send(Action::ReplyReceived(result)).is_err() {
            warn!("Reply arrived after the UI shut down");
        }
    });
}

fn spawn_clear(backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let result = backend.clear_history().await;
        if tx.send(Action::ClearFinished(result)).is_err() {
            warn!("Clear result arrived after the UI shut down");
        }
    });
}

fn persist_theme(path: Option<&Path>, theme: Theme) {
    let Some(path) = path else {
        debug!("No preferences path; theme {:?} not saved", theme);
        return;
    };
    if let Err(e) = prefs::save_theme(path, theme) {
        warn!("Failed to save theme preference: {}", e);
    }
}

pub fn run(config: ResolvedConfig, history: Vec<Message>) -> std::io::Result<()> {
    let client = HttpChatClient::from_config(&config).map_err(std::io::Error::other)?;
    let backend: Arc<dyn ChatBackend> = Arc::new(client);

    let theme = config
        .prefs_path
        .as_deref()
        .map(prefs::load_theme)
        .unwrap_or_default();
    let mut app = App::new(theme, config.formats.clone(), config.max_message_chars);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher {
        backend,
        tx,
        prefs_path: config.prefs_path.clone(),
    };
    dispatcher.apply(&mut app, &mut tui, Action::Init(history));

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let result = event_loop(&mut terminal, &mut app, &mut tui, &dispatcher, &rx);

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("TUI exited");
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &Dispatcher,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_INTERVAL);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            tui.sync(app);
            if let Some(action) = route_event(&event, tui)
                && dispatcher.apply(app, tui, action)
            {
                return Ok(());
            }
        }

        // Results from background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatcher.apply(app, tui, action) {
                return Ok(());
            }
        }
    }
}
