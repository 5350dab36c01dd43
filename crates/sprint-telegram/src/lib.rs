//! Telegram Bot API transport for the sprint practice bot.
//!
//! Provides the serde types for inbound webhook updates and a thin
//! [`reqwest`]-based client implementing
//! [`ChatTransport`](sprint_core::transport::ChatTransport). Nothing here
//! knows about sessions or review items; the crate is wire plumbing only.

pub mod client;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use error::{Error, Result};
