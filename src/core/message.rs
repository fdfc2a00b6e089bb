//! # Messages
//!
//! The one piece of conversation data: who said what, and when.
//! Messages are ephemeral. They live in the transcript for the current
//! run and are never written back anywhere.
//!
//! Prior history can be seeded from a JSON file that uses the same
//! `{role, text, ts}` shape the chat server keeps in its session.

use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Bot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// ISO-8601 timestamp. Kept verbatim; formatting happens at display time.
    #[serde(default, rename = "ts", alias = "timestamp")]
    pub ts: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            ts: Some(ts.into()),
        }
    }

    pub fn bot(text: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            ts: Some(ts.into()),
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "history I/O error: {e}"),
            HistoryError::Parse(e) => write!(f, "history parse error: {e}"),
        }
    }
}

impl std::error::Error for HistoryError {}

/// Reads a JSON array of messages to show on startup.
pub fn load_history(path: &Path) -> Result<Vec<Message>, HistoryError> {
    let contents = fs::read_to_string(path).map_err(HistoryError::Io)?;
    let messages: Vec<Message> = serde_json::from_str(&contents).map_err(HistoryError::Parse)?;
    info!("Loaded {} history messages from {}", messages.len(), path.display());
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_server_session_format() {
        let json = r#"[
            {"role": "user", "text": "hi", "ts": "2024-01-01T10:00:00+00:00"},
            {"role": "bot", "text": "hello!", "ts": "2024-01-01T10:00:02+00:00", "debug": {}}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("hi", "2024-01-01T10:00:00+00:00"));
        assert_eq!(messages[1].role, Role::Bot);
    }

    #[test]
    fn accepts_assistant_role_and_timestamp_key() {
        let json = r#"{"role": "assistant", "text": "ok", "timestamp": "2024-01-01T10:00:00Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, Role::Bot);
        assert_eq!(message.ts.as_deref(), Some("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn missing_timestamp_is_none() {
        let message: Message = serde_json::from_str(r#"{"role": "user", "text": "x"}"#).unwrap();
        assert!(message.ts.is_none());
    }

    #[test]
    fn load_history_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"role": "user", "text": "from disk"}}]"#).unwrap();

        let messages = load_history(file.path()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "from disk");
    }

    #[test]
    fn load_history_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            load_history(file.path()),
            Err(HistoryError::Parse(_))
        ));
    }

    #[test]
    fn load_history_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_history(&dir.path().join("nope.json")),
            Err(HistoryError::Io(_))
        ));
    }
}
