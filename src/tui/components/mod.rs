//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: App name, date header, loading indicator, theme
//! - `Bubble`: A single chat message
//! - `ErrorBanner`: The inline error slot
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: The message composer
//! - `MessageList`: Scrollable transcript, pinned to the newest bubble
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Scrollable transcript)
//! ├── error_banner.rs  (Inline error)
//! └── input_box/       (Composer: buffer, cursor, wrapping)
//! ```

pub mod error_banner;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;

pub use error_banner::ErrorBanner;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
