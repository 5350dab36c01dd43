//! Session — one user's run through an ordered queue of questions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One quiz run.
///
/// The queue is append-only at the tail: a wrong answer re-schedules its
/// question as the last element, so `debt_count` always equals
/// `question_queue.len() - original_count`. Once `completed` is set the
/// session is terminal and no field moves again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub session_id:     Uuid,
  pub question_queue: Vec<Uuid>,
  pub current_index:  usize,
  /// Queue length at creation; never changes afterwards.
  pub original_count: usize,
  pub debt_count:     u32,
  pub completed:      bool,
}

impl Session {
  /// Start a new run over `questions`, in order.
  pub fn new(questions: Vec<Uuid>) -> Self {
    Self {
      session_id:     Uuid::new_v4(),
      original_count: questions.len(),
      question_queue: questions,
      current_index:  0,
      debt_count:     0,
      completed:      false,
    }
  }

  /// The id of the question awaiting an answer, if the run is still open.
  pub fn current_question(&self) -> Option<Uuid> {
    if self.completed {
      return None;
    }
    self.question_queue.get(self.current_index).copied()
  }
}

/// Append-only record of one answered question. Written once per tap that
/// reaches the engine; never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
  pub session_id:      Uuid,
  pub question_id:     Uuid,
  pub category:        String,
  pub is_correct:      bool,
  /// True when the answered slot sat at or past `original_count` — a debt
  /// retry rather than a first encounter.
  pub is_debt_attempt: bool,
}
