//! Webhook error type and its HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

/// A store or transport failure while handling one inbound event.
///
/// These are not retried and not rendered for the user; the event fails
/// outright with a 500 and the platform may redeliver. User-visible
/// failures (expired sessions, missing questions) are notices, not errors.
#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("invalid seed record: {0}")]
  Seed(#[from] sprint_core::Error),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn transport<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Transport(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    tracing::error!(error = %self, "event handling failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
  }
}
