//! Telegram webhook service for the sprint practice bot.
//!
//! Exposes an axum [`Router`] with a single `POST /webhook` route backed by
//! any [`PracticeStore`] and [`ChatTransport`]. Inbound updates are
//! discriminated by payload shape: a `callback_query` is a button tap (quiz
//! answer or graveyard action, decided by its data-string prefix), a
//! `poll_answer` is a vote in the daily flaw poll. Everything else is
//! answered 200 with no effect.

pub mod deliver;
pub mod error;
pub mod quiz;
pub mod render;
pub mod review;
pub mod seed;

use std::{path::PathBuf, sync::Arc};

use axum::{
  extract::State,
  http::StatusCode,
  routing::post,
  Json, Router,
};
use serde::Deserialize;
use sprint_core::{
  callback::CallbackData,
  store::PracticeStore,
  transport::ChatTransport,
};
use sprint_telegram::types::{CallbackQuery, Update};
use tower_http::trace::TraceLayer;

pub use error::Error;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_quiz_size() -> usize { 5 }

/// Runtime configuration, deserialised from `config.toml` plus `SPRINT_*`
/// environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  pub telegram_token: String,
  /// The chat all deliveries and poll confirmations go to.
  pub chat_id:        i64,
  /// Override for the Bot API root; tests point this at a local stub.
  pub api_root:       Option<String>,
  /// Questions per delivered quiz.
  #[serde(default = "default_quiz_size")]
  pub quiz_size:      usize,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the webhook handler.
#[derive(Clone)]
pub struct AppState<S, T> {
  pub store:     Arc<S>,
  pub transport: Arc<T>,
  /// Poll votes carry no chat of their own; confirmations go here.
  pub chat_id:   i64,
}

/// Context of an inbound button tap: the event to acknowledge and the
/// message the outcome edits.
#[derive(Debug, Clone)]
pub struct TapEvent {
  pub event_id:   String,
  pub chat_id:    i64,
  pub message_id: i64,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the webhook router.
pub fn router<S, T>(state: AppState<S, T>) -> Router
where
  S: PracticeStore + Clone + 'static,
  T: ChatTransport + Clone + 'static,
{
  Router::new()
    .route("/webhook", post(webhook_handler::<S, T>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn webhook_handler<S, T>(
  State(state): State<AppState<S, T>>,
  Json(update): Json<Update>,
) -> Result<StatusCode, Error>
where
  S: PracticeStore + Clone + 'static,
  T: ChatTransport + Clone + 'static,
{
  if let Some(cq) = update.callback_query {
    handle_callback(&state, cq).await?;
  } else if let Some(vote) = update.poll_answer {
    let active = state
      .store
      .active_review_item()
      .await
      .map_err(Error::store)?;
    review::handle_poll_vote(
      &*state.store,
      &*state.transport,
      state.chat_id,
      active,
      &vote.option_ids,
    )
    .await?;
  }
  // Anything else (plain messages, edits, joins) is noise for this bot.
  Ok(StatusCode::OK)
}

async fn handle_callback<S, T>(
  state: &AppState<S, T>,
  cq: CallbackQuery,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  // A tap without an originating message cannot be routed to an edit;
  // acknowledge and drop.
  let Some(message) = cq.message else {
    return state
      .transport
      .ack_event(cq.id, None)
      .await
      .map_err(Error::transport);
  };

  let tap = TapEvent {
    event_id:   cq.id,
    chat_id:    message.chat.id,
    message_id: message.message_id,
  };

  match CallbackData::decode(cq.data.as_deref().unwrap_or_default()) {
    CallbackData::Quiz { session_id, option_index } => {
      quiz::handle_answer(
        &*state.store,
        &*state.transport,
        &tap,
        session_id,
        option_index,
      )
      .await
    }
    CallbackData::Review { item_id, action } => {
      review::handle_graveyard(&*state.store, &*state.transport, &tap, item_id, action)
        .await
    }
    CallbackData::Unrecognized => state
      .transport
      .ack_event(tap.event_id, None)
      .await
      .map_err(Error::transport),
  }
}

// ─── Test support ─────────────────────────────────────────────────────────────


// ─── Integration tests ────────────────────────────────────────────────────────
