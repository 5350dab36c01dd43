//! The `ChatTransport` trait — the narrow outbound contract to the chat
//! platform.
//!
//! Each inbound event produces at most one edit or send, plus the
//! acknowledgment the platform requires for button taps. All calls are
//! awaited sequentially within one event's handling; no retries live here.
//! `sprint-telegram` provides the real implementation; tests substitute a
//! recording fake.

use std::future::Future;

// ─── Keyboard ────────────────────────────────────────────────────────────────

/// One tappable button. `data` is a
/// [`CallbackData`](crate::callback::CallbackData) encoding, never option
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
  pub label: String,
  pub data:  String,
}

/// An inline keyboard: rows of at most two buttons, order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
  pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
  /// Lay `buttons` out as a grid of rows of at most two.
  pub fn two_per_row(buttons: Vec<Button>) -> Self {
    let mut rows: Vec<Vec<Button>> = Vec::new();
    for button in buttons {
      match rows.last_mut() {
        Some(row) if row.len() < 2 => row.push(button),
        _ => rows.push(vec![button]),
      }
    }
    Self { rows }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Outbound side of the chat platform.
pub trait ChatTransport: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Acknowledge an inbound button tap, optionally with a short transient
  /// notice.
  fn ack_event(
    &self,
    event_id: String,
    text: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the text (and keyboard) of an existing message.
  fn edit_message(
    &self,
    chat_id: i64,
    message_id: i64,
    text: String,
    keyboard: Option<Keyboard>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Send a new message, optionally with a keyboard.
  fn send_message(
    &self,
    chat_id: i64,
    text: String,
    keyboard: Option<Keyboard>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Send a quiz-type poll whose options are solution steps.
  fn send_quiz_poll(
    &self,
    chat_id: i64,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
