//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ChatBackend, ClientError};
use crate::core::format::{DisplayZone, TimeFormats};
use crate::core::prefs::Theme;
use crate::core::state::App;

/// A backend that replays canned results and records what it was asked.
pub struct ScriptedBackend {
    pub replies: Mutex<Vec<Result<Value, ClientError>>>,
    pub clear_result: Result<(), ClientError>,
    pub sent: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<Value, ClientError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            clear_result: Ok(()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, message: &str) -> Result<Value, ClientError> {
        self.sent.lock().unwrap().push(message.to_string());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ClientError::Network("no scripted reply".to_string()));
        }
        replies.remove(0)
    }

    async fn clear_history(&self) -> Result<(), ClientError> {
        self.clear_result.clone()
    }
}

/// Times shown in UTC so assertions don't depend on the machine's zone.
pub fn utc_formats() -> TimeFormats {
    TimeFormats {
        zone: DisplayZone::Utc,
        ..TimeFormats::default()
    }
}

/// Creates a test App: light theme, UTC labels, 2000-char limit.
pub fn test_app() -> App {
    App::new(Theme::Light, utc_formats(), 2000)
}
