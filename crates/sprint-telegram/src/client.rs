//! Async HTTP client for the Telegram Bot API.

use std::time::Duration;

use serde_json::json;
use sprint_core::transport::{ChatTransport, Keyboard};

use crate::{
  types::InlineKeyboardMarkup,
  Error, Result,
};

/// The Bot API host used unless an override is supplied.
const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// Quiz prompts and graveyard nudges are formatted as Markdown.
const PARSE_MODE: &str = "Markdown";

/// A thin client over the Bot API methods this bot calls.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramClient {
  client:   reqwest::Client,
  base_url: String,
}

impl TelegramClient {
  /// Build a client for `token` against the public Bot API host.
  pub fn new(token: &str) -> Result<Self> {
    Self::with_api_root(token, DEFAULT_API_ROOT)
  }

  /// Build a client against a custom API root. Used by tests to point the
  /// transport at a local stub instead of the network.
  pub fn with_api_root(token: &str, api_root: &str) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      base_url: format!("{}/bot{token}", api_root.trim_end_matches('/')),
    })
  }

  async fn call(&self, method: &str, body: serde_json::Value) -> Result<()> {
    let resp = self
      .client
      .post(format!("{}/{method}", self.base_url))
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      tracing::warn!(%status, method, "telegram call failed");
      return Err(Error::Api { status, body });
    }
    Ok(())
  }
}

impl ChatTransport for TelegramClient {
  type Error = Error;

  async fn ack_event(&self, event_id: String, text: Option<String>) -> Result<()> {
    let mut body = json!({ "callback_query_id": event_id });
    if let Some(text) = text {
      body["text"] = json!(text);
    }
    self.call("answerCallbackQuery", body).await
  }

  async fn edit_message(
    &self,
    chat_id: i64,
    message_id: i64,
    text: String,
    keyboard: Option<Keyboard>,
  ) -> Result<()> {
    let mut body = json!({
      "chat_id": chat_id,
      "message_id": message_id,
      "text": text,
      "parse_mode": PARSE_MODE,
    });
    if let Some(kb) = keyboard {
      body["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(&kb))?;
    }
    self.call("editMessageText", body).await
  }

  async fn send_message(
    &self,
    chat_id: i64,
    text: String,
    keyboard: Option<Keyboard>,
  ) -> Result<()> {
    let mut body = json!({
      "chat_id": chat_id,
      "text": text,
      "parse_mode": PARSE_MODE,
    });
    if let Some(kb) = keyboard {
      body["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(&kb))?;
    }
    self.call("sendMessage", body).await
  }

  async fn send_quiz_poll(
    &self,
    chat_id: i64,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
  ) -> Result<()> {
    let body = json!({
      "chat_id": chat_id,
      "question": question,
      "options": options,
      "type": "quiz",
      "correct_option_id": correct_index,
      "explanation": explanation,
      "is_anonymous": false,
    });
    self.call("sendPoll", body).await
  }
}
