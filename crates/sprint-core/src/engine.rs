//! The debt-queue engine — pure advancement logic for a quiz session.
//!
//! A wrong answer re-schedules its question at the tail of the queue rather
//! than re-asking it immediately, and completion is judged against the
//! updated queue, so a miss on the last slot extends the run by exactly one.

use uuid::Uuid;

use crate::{question::Question, session::Session};

/// The outcome of answering the current question.
///
/// Persisting the mutated session, appending the attempt record, and
/// bumping the question counters are all the caller's side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
  pub is_correct:         bool,
  pub updated_queue:      Vec<Uuid>,
  pub updated_debt_count: u32,
  pub next_index:         usize,
  /// Judged against the pre-advance index, never recomputed after the
  /// queue mutation.
  pub is_debt_attempt:    bool,
  pub is_complete:        bool,
}

/// Advance `session` by one answer.
///
/// The caller guarantees the session is not completed and that `question`
/// is the item at `question_queue[current_index]`.
pub fn advance(
  session: &Session,
  question: &Question,
  selected_index: usize,
) -> Advance {
  let is_correct = selected_index == question.correct_answer_index;
  let is_debt_attempt = session.current_index >= session.original_count;

  let mut updated_queue = session.question_queue.clone();
  let mut updated_debt_count = session.debt_count;
  if !is_correct {
    updated_queue.push(question.question_id);
    updated_debt_count += 1;
  }

  // The just-answered slot is never revisited immediately; a failed
  // question comes back at the new tail.
  let next_index = session.current_index + 1;
  let is_complete = next_index >= updated_queue.len();

  Advance {
    is_correct,
    updated_queue,
    updated_debt_count,
    next_index,
    is_debt_attempt,
    is_complete,
  }
}
