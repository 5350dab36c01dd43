//! Question — a multiple-choice quiz item.
//!
//! Question content is never mutated after it enters the bank; the two
//! usage counters are the only columns a quiz attempt touches.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The most options a question may carry. The option keyboard lays buttons
/// out two per row, so four options fill a 2×2 grid.
pub const MAX_OPTIONS: usize = 4;

/// A multiple-choice quiz item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub question_id:          Uuid,
  pub text:                 String,
  /// At most [`MAX_OPTIONS`] entries, in presentation order.
  pub options:              Vec<String>,
  /// Zero-based index into `options`.
  pub correct_answer_index: usize,
  pub category:             String,
  pub times_attempted:      u32,
  pub times_correct:        u32,
}

impl Question {
  /// Build a new bank entry with fresh counters, validating the option set.
  pub fn new(
    text: String,
    options: Vec<String>,
    correct_answer_index: usize,
    category: String,
  ) -> Result<Self> {
    if options.len() > MAX_OPTIONS {
      return Err(Error::TooManyOptions {
        max: MAX_OPTIONS,
        got: options.len(),
      });
    }
    if correct_answer_index >= options.len() {
      return Err(Error::AnswerIndexOutOfRange {
        index: correct_answer_index,
        count: options.len(),
      });
    }
    Ok(Self {
      question_id: Uuid::new_v4(),
      text,
      options,
      correct_answer_index,
      category,
      times_attempted: 0,
      times_correct: 0,
    })
  }
}
