//! HTTP client for the chat server.
//!
//! Every call is a JSON POST bounded by a timeout that covers the whole
//! exchange: connect, headers and body. Failures are folded into
//! [`ClientError`] so callers only ever see one error shape.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use super::backend::{ChatBackend, ClientError};
use super::types::{CHAT_PATH, CLEAR_PATH, ChatRequest, ClearRequest};
use crate::core::config::ResolvedConfig;

pub struct HttpChatClient {
    base_url: String,
    timeout: Duration,
    debug: bool,
    client: reqwest::Client,
}

impl HttpChatClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// The cookie store is on: the server keys its conversation on a
    /// session cookie, and `/api/clear` must hit the same session as `/api/chat`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            timeout,
            debug: false,
            client,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ClientError> {
        Ok(Self::new(config.base_url.clone(), config.timeout)?.with_debug(config.debug))
    }

    /// Ask the server to include its debug trace with every reply.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POSTs `body` as JSON to `path` using the client's default timeout.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.post_json_with_timeout(path, body, self.timeout).await
    }

    /// POSTs `body` as JSON to `path`, giving up after `timeout`.
    ///
    /// A success status yields the parsed body; a body that isn't valid
    /// JSON reads as `{}`. A failure status yields `ClientError::Server`
    /// carrying the body's `error` string, or `Request failed (<status>)`.
    pub async fn post_json_with_timeout<B>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} (timeout {:?})", url, timeout);

        match tokio::time::timeout(timeout, self.exchange(&url, body)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("POST {} timed out after {:?}", url, timeout);
                Err(ClientError::TimedOut)
            }
        }
    }

    async fn exchange<B>(&self, url: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!("POST {} -> {}", url, status);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let data: Value = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!("Response body is not JSON ({}), treating as {{}}", e);
            Value::Object(Map::new())
        });

        if !status.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .filter(|msg| !msg.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));
            warn!("Server error: {} - {}", status.as_u16(), message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send_message(&self, message: &str) -> Result<Value, ClientError> {
        info!("Sending chat message ({} chars)", message.chars().count());
        let request = ChatRequest {
            message,
            debug: self.debug,
        };
        let payload = self.post_json(CHAT_PATH, &request).await?;
        if let Some(trace) = payload.get("debug") {
            debug!("Server debug trace: {}", trace);
        }
        Ok(payload)
    }

    async fn clear_history(&self) -> Result<(), ClientError> {
        info!("Clearing server-side history");
        self.post_json(CLEAR_PATH, &ClearRequest {}).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let client = HttpChatClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.timeout(), Duration::from_secs(1));
        assert!(!client.debug);
    }

    #[test]
    fn with_debug_sets_flag() {
        let client = HttpChatClient::new("http://localhost:5000", Duration::from_secs(1))
            .unwrap()
            .with_debug(true);
        assert!(client.debug);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) is closed on any sane test machine.
        let client = HttpChatClient::new("http://127.0.0.1:9", Duration::from_secs(5)).unwrap();
        let result = client.send_message("hello").await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
