//! Error types for `sprint-core`.
//!
//! Only construction-time validation lives here; stale references and
//! guard rejections are ordinary outcomes, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("a question carries at most {max} options, got {got}")]
  TooManyOptions { max: usize, got: usize },

  #[error("correct answer index {index} is out of range for {count} options")]
  AnswerIndexOutOfRange { index: usize, count: usize },

  #[error("a flaw problem needs at least one solution step")]
  NoSolutionSteps,

  #[error("flawed step {step} is out of range for {count} solution steps")]
  FlawedStepOutOfRange { step: u32, count: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
