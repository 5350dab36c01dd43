//! The button data-string protocol.
//!
//! Button payloads are compact pipe-delimited strings, so a tap carries
//! only ids and positions and never echoes option text back. Two prefixes
//! are recognised: `sp` for quiz answers, `gy` for graveyard actions.
//! Everything else decodes to [`CallbackData::Unrecognized`] and is
//! acknowledged with no further effect.

use uuid::Uuid;

/// Graveyard button action. Any token other than `got_it` reads as a defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
  GotIt,
  Defer,
}

impl ReviewAction {
  fn token(self) -> &'static str {
    match self {
      Self::GotIt => "got_it",
      Self::Defer => "defer",
    }
  }
}

/// A decoded button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
  /// `sp|<session-id>|<option-index>` — an answer to the current question.
  Quiz {
    session_id:   Uuid,
    option_index: usize,
  },
  /// `gy|<review-item-id>|<action>` — a graveyard re-confirmation.
  Review {
    item_id: Uuid,
    action:  ReviewAction,
  },
  /// Unknown prefix or malformed payload.
  Unrecognized,
}

impl CallbackData {
  /// Decode a raw `callback_data` string. Never fails; anything that does
  /// not parse decodes to [`CallbackData::Unrecognized`].
  pub fn decode(raw: &str) -> Self {
    let mut parts = raw.splitn(3, '|');
    let (Some(prefix), Some(id), Some(tail)) =
      (parts.next(), parts.next(), parts.next())
    else {
      return Self::Unrecognized;
    };

    match prefix {
      "sp" => {
        let (Ok(session_id), Ok(option_index)) =
          (Uuid::parse_str(id), tail.parse::<usize>())
        else {
          return Self::Unrecognized;
        };
        Self::Quiz { session_id, option_index }
      }
      "gy" => match Uuid::parse_str(id) {
        Ok(item_id) => Self::Review {
          item_id,
          action: if tail == "got_it" {
            ReviewAction::GotIt
          } else {
            ReviewAction::Defer
          },
        },
        Err(_) => Self::Unrecognized,
      },
      _ => Self::Unrecognized,
    }
  }

  /// Encode a quiz answer payload for an option keyboard button.
  pub fn quiz(session_id: Uuid, option_index: usize) -> String {
    format!("sp|{session_id}|{option_index}")
  }

  /// Encode a graveyard action payload.
  pub fn review(item_id: Uuid, action: ReviewAction) -> String {
    format!("gy|{item_id}|{}", action.token())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quiz_payload_round_trips() {
    let id = Uuid::new_v4();
    let raw = CallbackData::quiz(id, 2);
    assert_eq!(
      CallbackData::decode(&raw),
      CallbackData::Quiz { session_id: id, option_index: 2 },
    );
  }

  #[test]
  fn got_it_decodes_as_got_it() {
    let id = Uuid::new_v4();
    let raw = CallbackData::review(id, ReviewAction::GotIt);
    assert_eq!(
      CallbackData::decode(&raw),
      CallbackData::Review { item_id: id, action: ReviewAction::GotIt },
    );
  }

  #[test]
  fn any_other_review_token_decodes_as_defer() {
    let id = Uuid::new_v4();
    let decoded = CallbackData::decode(&format!("gy|{id}|later"));
    assert_eq!(
      decoded,
      CallbackData::Review { item_id: id, action: ReviewAction::Defer },
    );
  }

  #[test]
  fn unknown_prefix_is_unrecognized() {
    let id = Uuid::new_v4();
    assert_eq!(CallbackData::decode(&format!("xx|{id}|0")), CallbackData::Unrecognized);
  }

  #[test]
  fn malformed_payloads_are_unrecognized() {
    assert_eq!(CallbackData::decode(""), CallbackData::Unrecognized);
    assert_eq!(CallbackData::decode("sp"), CallbackData::Unrecognized);
    assert_eq!(CallbackData::decode("sp|not-a-uuid|0"), CallbackData::Unrecognized);
    let id = Uuid::new_v4();
    assert_eq!(
      CallbackData::decode(&format!("sp|{id}|three")),
      CallbackData::Unrecognized,
    );
  }
}
