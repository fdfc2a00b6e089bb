use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Everything that can go wrong talking to the chat server.
/// Every variant ends up as text in the error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No complete response arrived within the timeout.
    TimedOut,
    /// Transport failure (DNS, connection refused, reset mid-body).
    Network(String),
    /// Non-2xx status. `message` is the body's `error` field, or a generic fallback.
    Server { status: u16, message: String },
    /// The HTTP client itself could not be built.
    Config(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::TimedOut => write!(f, "Request timed out. Please try again."),
            ClientError::Network(msg) => write!(f, "Network error: {msg}"),
            ClientError::Server { message, .. } => write!(f, "{message}"),
            ClientError::Config(msg) => write!(f, "Client error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// The two calls the chat UI makes. `HttpChatClient` is the real thing;
/// tests swap in scripted backends.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Posts one user message. Returns the raw JSON payload; judging whether
    /// it holds a usable reply is the caller's job.
    async fn send_message(&self, message: &str) -> Result<Value, ClientError>;

    /// Asks the server to forget the conversation.
    async fn clear_history(&self) -> Result<(), ClientError>;
}
