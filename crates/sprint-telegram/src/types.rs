//! Wire types for the slice of the Telegram Bot API this bot consumes.
//!
//! Inbound updates are discriminated by payload shape: a quiz tap arrives
//! as `callback_query`, a flaw-poll vote as `poll_answer`. Unknown fields
//! are ignored wholesale, so the types stay a strict subset of the API.

use serde::{Deserialize, Serialize};

use sprint_core::transport::Keyboard;

// ─── Inbound ─────────────────────────────────────────────────────────────────

/// One webhook update. At most one of the payload fields is set.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id:      i64,
  pub callback_query: Option<CallbackQuery>,
  pub poll_answer:    Option<PollAnswer>,
}

/// A button tap. `id` must be acknowledged; `data` is the opaque payload
/// the button was created with.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
  pub id:      String,
  pub data:    Option<String>,
  pub message: Option<Message>,
}

/// The message a tapped button was attached to.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub chat:       Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

/// A vote in a (non-anonymous) poll. `option_ids` holds the chosen option
/// indices; this quiz format only ever reads the first.
#[derive(Debug, Clone, Deserialize)]
pub struct PollAnswer {
  pub poll_id:    String,
  pub option_ids: Vec<usize>,
}

// ─── Outbound ────────────────────────────────────────────────────────────────

/// An inline keyboard in Bot API shape.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
  pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
  pub text:          String,
  pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
  fn from(keyboard: &Keyboard) -> Self {
    Self {
      inline_keyboard: keyboard
        .rows
        .iter()
        .map(|row| {
          row
            .iter()
            .map(|b| InlineKeyboardButton {
              text:          b.label.clone(),
              callback_data: b.data.clone(),
            })
            .collect()
        })
        .collect(),
    }
  }
}
