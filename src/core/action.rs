//! # Actions
//!
//! Everything that can happen in the chat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Server answers? That's `Action::ReplyReceived(result)`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect`: the one piece of I/O the caller should perform next. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Send/response cycle
//!
//! ```text
//!          Submit(text)                ReplyReceived(Ok(reply))
//!   Idle ───────────────▶ Sending ─────────────────────────────▶ Success ─┐
//!    ▲                       │                                            │
//!    │                       │ ReplyReceived(Err | no reply)              │
//!    │                       └──────────────────────────────▶ Failure ────┤
//!    └────────────────────── always: loading off, focus composer ◀────────┘
//! ```
//!
//! Every state change for `Idle -> Sending` (composer disabled, loading on)
//! is made before `Effect::SendMessage` is returned, so by the time the
//! caller spawns the request a second submit is already refused.

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::{ClientError, reply_text};
use crate::core::format::{now_timestamp, truncate_chars};
use crate::core::message::Message;
use crate::core::prefs::Theme;
use crate::core::state::{App, Phase};

/// Banner text when the server answers 2xx without a usable `reply`.
pub const NO_REPLY_MESSAGE: &str = "No reply received from server.";

#[derive(Debug)]
pub enum Action {
    /// Startup: seed the transcript with earlier history.
    Init(Vec<Message>),
    /// Composer submitted.
    Submit(String),
    /// Outcome of the chat request.
    ReplyReceived(Result<Value, ClientError>),
    /// Clear-history requested.
    Clear,
    /// Outcome of the clear request.
    ClearFinished(Result<(), ClientError>),
    ToggleTheme,
    Quit,
}

/// I/O the caller must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// POST this text to the chat endpoint, then feed back `ReplyReceived`.
    SendMessage(String),
    /// POST to the clear endpoint, then feed back `ClearFinished`.
    ClearHistory,
    /// Write the theme to the prefs file.
    PersistTheme(Theme),
    /// All client state was discarded; presentation state should be too.
    Reload,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Init(history) => {
            init(app, history);
            Effect::None
        }
        Action::Submit(text) => submit(app, &text),
        Action::ReplyReceived(result) => {
            receive_reply(app, result);
            Effect::None
        }
        Action::Clear => begin_clear(app),
        Action::ClearFinished(result) => finish_clear(app, result),
        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            info!("Theme switched to {}", app.theme.label());
            Effect::PersistTheme(app.theme)
        }
        Action::Quit => Effect::Quit,
    }
}

fn init(app: &mut App, history: Vec<Message>) {
    info!("Initializing with {} history messages", history.len());

    let first_ts = history
        .iter()
        .find_map(|m| m.ts.as_deref().filter(|ts| !ts.is_empty()))
        .map(str::to_string);

    if !history.is_empty() {
        app.show_placeholder = false;
    }
    app.transcript.extend(history);
    if let Some(ts) = first_ts {
        app.ensure_date_header(&ts);
    }

    // Never start with a stuck loading indicator.
    return_to_idle(app);
    app.request_scroll();
}

fn submit(app: &mut App, text: &str) -> Effect {
    let message = text.trim();
    if message.is_empty() {
        return Effect::None;
    }
    if app.phase != Phase::Idle {
        debug!("Ignoring submit while {:?}", app.phase);
        return Effect::None;
    }

    app.clear_error();
    let message = truncate_chars(message, app.max_message_chars).into_owned();
    app.add_bubble(Message::user(message.clone(), now_timestamp()));
    app.set_loading(true);
    app.composer_focused = false;
    app.phase = Phase::Sending;
    app.request_scroll();

    Effect::SendMessage(message)
}

fn receive_reply(app: &mut App, result: Result<Value, ClientError>) {
    if app.phase != Phase::Sending {
        warn!("Dropping reply that arrived while {:?}", app.phase);
        return;
    }

    match result {
        Ok(payload) => match reply_text(&payload) {
            Some(reply) => app.add_bubble(Message::bot(reply, now_timestamp())),
            None => {
                warn!("Reply payload has no usable reply: {}", payload);
                app.show_error(NO_REPLY_MESSAGE);
            }
        },
        Err(e) => {
            warn!("Chat request failed: {:?}", e);
            app.show_error(e.to_string());
        }
    }

    return_to_idle(app);
}

fn begin_clear(app: &mut App) -> Effect {
    if app.phase != Phase::Idle {
        debug!("Ignoring clear while {:?}", app.phase);
        return Effect::None;
    }
    app.clear_error();
    app.set_loading(true);
    app.composer_focused = false;
    app.phase = Phase::Clearing;
    Effect::ClearHistory
}

fn finish_clear(app: &mut App, result: Result<(), ClientError>) -> Effect {
    if app.phase != Phase::Clearing {
        warn!("Dropping clear result that arrived while {:?}", app.phase);
        return Effect::None;
    }

    match result {
        Ok(()) => {
            info!("History cleared, reloading");
            app.reset();
            Effect::Reload
        }
        Err(e) => {
            warn!("Clear request failed: {:?}", e);
            app.show_error(e.to_string());
            return_to_idle(app);
            Effect::None
        }
    }
}

fn return_to_idle(app: &mut App) {
    app.set_loading(false);
    app.phase = Phase::Idle;
    app.composer_focused = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::test_support::test_app;
    use serde_json::json;

    fn sending_app(text: &str) -> App {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit(text.to_string()));
        assert_eq!(effect, Effect::SendMessage(text.trim().to_string()));
        app
    }

    fn bot_bubbles(app: &App) -> usize {
        app.transcript.iter().filter(|m| m.role == Role::Bot).count()
    }

    #[test]
    fn submit_echoes_user_message_before_reply() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  hello there \n".to_string()));

        assert_eq!(effect, Effect::SendMessage("hello there".to_string()));
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].role, Role::User);
        assert_eq!(app.transcript[0].text, "hello there");
        assert!(app.transcript[0].ts.is_some());
        assert!(app.loading);
        assert!(!app.composer_enabled());
        assert!(!app.composer_focused);
        assert_eq!(app.phase, Phase::Sending);
        assert!(app.date_header.is_some());
        assert!(app.take_scroll_request());
    }

    #[test]
    fn submit_clears_previous_error() {
        let mut app = test_app();
        app.show_error("old");
        update(&mut app, Action::Submit("hi".to_string()));
        assert!(app.error.is_none());
    }

    #[test]
    fn empty_or_whitespace_submit_is_a_no_op() {
        for input in ["", " ", "\n\t  \n"] {
            let mut app = test_app();
            app.show_error("keep me");
            let before = app.clone();

            let effect = update(&mut app, Action::Submit(input.to_string()));

            assert_eq!(effect, Effect::None, "input {input:?}");
            assert_eq!(app, before, "input {input:?}");
        }
    }

    #[test]
    fn second_submit_while_sending_is_refused() {
        let mut app = sending_app("first");
        let effect = update(&mut app, Action::Submit("second".to_string()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn long_message_is_truncated_before_echo() {
        let mut app = test_app();
        app.max_message_chars = 5;
        let effect = update(&mut app, Action::Submit("abcdefgh".to_string()));

        assert_eq!(effect, Effect::SendMessage("abcd…".to_string()));
        assert_eq!(app.transcript[0].text, "abcd…");
    }

    #[test]
    fn reply_renders_one_bot_bubble_and_returns_to_idle() {
        let mut app = sending_app("hi");
        update(&mut app, Action::ReplyReceived(Ok(json!({"ok": true, "reply": "X"}))));

        assert_eq!(bot_bubbles(&app), 1);
        assert_eq!(app.transcript.last().unwrap().text, "X");
        assert!(!app.loading);
        assert!(app.composer_focused);
        assert_eq!(app.phase, Phase::Idle);
        assert!(app.error.is_none());
    }

    #[test]
    fn transport_failure_shows_error_and_returns_to_idle() {
        let mut app = sending_app("hi");
        update(
            &mut app,
            Action::ReplyReceived(Err(ClientError::Network("connection refused".into()))),
        );

        assert_eq!(bot_bubbles(&app), 0);
        assert_eq!(
            app.error.as_deref(),
            Some("Network error: connection refused")
        );
        assert!(!app.loading);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn server_failure_shows_server_message() {
        let mut app = sending_app("hi");
        update(
            &mut app,
            Action::ReplyReceived(Err(ClientError::Server {
                status: 500,
                message: "Request failed (500)".into(),
            })),
        );

        assert_eq!(bot_bubbles(&app), 0);
        assert_eq!(app.error.as_deref(), Some("Request failed (500)"));
        assert!(!app.loading);
    }

    #[test]
    fn timeout_shows_timeout_message() {
        let mut app = sending_app("hi");
        update(&mut app, Action::ReplyReceived(Err(ClientError::TimedOut)));

        let error = app.error.unwrap();
        assert!(error.contains("timed out"));
        assert!(!error.contains("Request failed"));
    }

    #[test]
    fn empty_or_missing_reply_is_a_contract_failure() {
        for payload in [json!({"reply": ""}), json!({}), json!({"reply": 7})] {
            let mut app = sending_app("hi");
            update(&mut app, Action::ReplyReceived(Ok(payload.clone())));

            assert_eq!(bot_bubbles(&app), 0, "payload {payload}");
            assert_eq!(app.error.as_deref(), Some(NO_REPLY_MESSAGE));
            assert!(!app.loading);
            assert_eq!(app.phase, Phase::Idle);
        }
    }

    #[test]
    fn stray_reply_while_idle_is_ignored() {
        let mut app = test_app();
        let before = app.clone();
        update(&mut app, Action::ReplyReceived(Ok(json!({"reply": "late"}))));
        assert_eq!(app, before);
    }

    #[test]
    fn clear_success_reloads() {
        let mut app = sending_app("hi");
        update(&mut app, Action::ReplyReceived(Ok(json!({"reply": "hey"}))));

        assert_eq!(update(&mut app, Action::Clear), Effect::ClearHistory);
        assert!(app.loading);
        assert_eq!(app.phase, Phase::Clearing);

        assert_eq!(update(&mut app, Action::ClearFinished(Ok(()))), Effect::Reload);
        assert!(app.transcript.is_empty());
        assert!(app.show_placeholder);
        assert!(!app.loading);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn clear_failure_keeps_transcript_and_shows_error() {
        let mut app = sending_app("hi");
        update(&mut app, Action::ReplyReceived(Ok(json!({"reply": "hey"}))));
        update(&mut app, Action::Clear);

        let effect = update(
            &mut app,
            Action::ClearFinished(Err(ClientError::Server {
                status: 503,
                message: "down".into(),
            })),
        );

        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.error.as_deref(), Some("down"));
        assert!(!app.loading);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn clear_while_sending_is_refused() {
        let mut app = sending_app("hi");
        assert_eq!(update(&mut app, Action::Clear), Effect::None);
        assert_eq!(app.phase, Phase::Sending);
    }

    #[test]
    fn toggle_theme_requests_persist() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::ToggleTheme),
            Effect::PersistTheme(Theme::Dark)
        );
        assert_eq!(
            update(&mut app, Action::ToggleTheme),
            Effect::PersistTheme(Theme::Light)
        );
    }

    #[test]
    fn init_hydrates_history_and_date_header() {
        let mut app = test_app();
        app.loading = true;
        let history = vec![
            Message {
                role: Role::User,
                text: "no stamp".into(),
                ts: None,
            },
            Message::user("q", "2024-01-01T10:00:00Z"),
            Message::bot("a", "2024-01-02T10:00:00Z"),
        ];

        assert_eq!(update(&mut app, Action::Init(history)), Effect::None);

        assert_eq!(app.transcript.len(), 3);
        assert!(!app.show_placeholder);
        assert_eq!(app.date_header.as_deref(), Some("Monday, Jan 01, 2024"));
        assert!(!app.loading);
        assert!(app.take_scroll_request());
    }

    #[test]
    fn init_without_history_keeps_placeholder() {
        let mut app = test_app();
        update(&mut app, Action::Init(Vec::new()));
        assert!(app.show_placeholder);
        assert!(app.date_header.is_none());
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
