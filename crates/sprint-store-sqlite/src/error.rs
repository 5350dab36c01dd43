//! Error type for `sprint-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("column decode error: {0}")]
  Decode(String),

  /// A point update targeted a session that does not exist.
  #[error("session not found: {0}")]
  SessionNotFound(uuid::Uuid),

  /// A point update targeted a question that does not exist.
  #[error("question not found: {0}")]
  QuestionNotFound(uuid::Uuid),

  /// A point update targeted a review item that does not exist.
  #[error("review item not found: {0}")]
  ReviewItemNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
