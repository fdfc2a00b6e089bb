//! # Chat server API
//!
//! Wire types, the [`ChatBackend`] seam, and the reqwest-based client.

pub mod backend;
pub mod client;
pub mod types;

pub use backend::{ChatBackend, ClientError};
pub use client::HttpChatClient;
pub use types::{ChatRequest, ClearRequest, reply_text};
