//! Delivery and reporting commands.
//!
//! Cron (or the operator) invokes these through the CLI; scheduling itself
//! lives outside the bot.

use sprint_core::{session::Session, store::PracticeStore, transport::ChatTransport};

use crate::{error::Error, render};

/// Start a quiz session over the least-attempted questions and send its
/// first prompt.
pub async fn deliver_quiz<S, T>(
  store: &S,
  transport: &T,
  chat_id: i64,
  quiz_size: usize,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let questions = store.sample_questions(quiz_size).await.map_err(Error::store)?;
  if questions.is_empty() {
    transport
      .send_message(chat_id, render::QUIZ_BANK_EMPTY.into(), None)
      .await
      .map_err(Error::transport)?;
    return Ok(());
  }

  let session = Session::new(questions.iter().map(|q| q.question_id).collect());
  let session_id = session.session_id;
  let total = session.question_queue.len();
  store.create_session(session).await.map_err(Error::store)?;

  let first = &questions[0];
  let text = render::prompt(0, total, 0, false, &first.text);
  let keyboard = render::option_keyboard(session_id, &first.options);
  transport
    .send_message(chat_id, text, Some(keyboard))
    .await
    .map_err(Error::transport)?;

  tracing::info!(%session_id, count = total, "quiz delivered");
  Ok(())
}

/// Deliver the daily spot-the-flaw poll.
///
/// Picks the oldest never-delivered pending item; once the deck is
/// exhausted, re-delivers the oldest caught item as a revision round. A
/// revision round re-points the poll but opens no daily-log entry — the
/// status guard would keep such a row from ever closing.
pub async fn deliver_flaw<S, T>(
  store: &S,
  transport: &T,
  chat_id: i64,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let (item, revision) = match store.next_undelivered_item().await.map_err(Error::store)? {
    Some(item) => (item, false),
    None => match store.oldest_caught_item().await.map_err(Error::store)? {
      Some(item) => (item, true),
      None => {
        transport
          .send_message(chat_id, render::FLAW_DECK_EMPTY.into(), None)
          .await
          .map_err(Error::transport)?;
        return Ok(());
      }
    },
  };

  let header = if revision { render::REVISION_HEADER } else { render::FLAW_HEADER };
  transport
    .send_message(chat_id, render::flaw_problem_message(header, &item.problem), None)
    .await
    .map_err(Error::transport)?;
  transport
    .send_quiz_poll(
      chat_id,
      render::FLAW_POLL_QUESTION.into(),
      item.solution_steps.clone(),
      item.correct_option_index(),
      render::flaw_poll_explanation(&item.error_category, &item.explanation),
    )
    .await
    .map_err(Error::transport)?;

  store
    .set_active_review_item(item.item_id)
    .await
    .map_err(Error::store)?;
  if !revision {
    store
      .mark_item_delivered(item.item_id)
      .await
      .map_err(Error::store)?;
    store
      .open_daily_log(item.item_id)
      .await
      .map_err(Error::store)?;
  }

  tracing::info!(item_id = %item.item_id, revision, "flaw problem delivered");
  Ok(())
}

/// Nudge the oldest missed problem for graveyard re-confirmation.
pub async fn deliver_graveyard<S, T>(
  store: &S,
  transport: &T,
  chat_id: i64,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let Some(item) = store.oldest_missed_item().await.map_err(Error::store)? else {
    transport
      .send_message(chat_id, render::GRAVEYARD_EMPTY.into(), None)
      .await
      .map_err(Error::transport)?;
    return Ok(());
  };

  transport
    .send_message(
      chat_id,
      render::graveyard_prompt(&item.problem),
      Some(render::graveyard_keyboard(item.item_id)),
    )
    .await
    .map_err(Error::transport)?;

  tracing::info!(item_id = %item.item_id, "graveyard nudge delivered");
  Ok(())
}

/// Send the weekly caught/missed fingerprint.
pub async fn weekly_report<S, T>(
  store: &S,
  transport: &T,
  chat_id: i64,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let outcomes = store.resolved_daily_outcomes().await.map_err(Error::store)?;
  transport
    .send_message(chat_id, render::weekly_report(&outcomes), None)
    .await
    .map_err(Error::transport)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::{Effect, FakeTransport};
  use sprint_core::{
    callback::CallbackData,
    question::Question,
    review::{ReviewItem, ReviewStatus},
    store::PracticeStore,
  };
  use sprint_store_sqlite::SqliteStore;

  const CHAT: i64 = 10;

  fn review_item(problem: &str) -> ReviewItem {
    ReviewItem::new(
      problem.into(),
      vec!["step 1".into(), "step 2".into()],
      2,
      "Sign Error".into(),
      "the sign flips".into(),
    )
    .unwrap()
  }

  #[tokio::test]
  async fn deliver_quiz_creates_a_session_and_sends_the_first_prompt() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    for i in 0..3 {
      let q = Question::new(
        format!("q{i}"),
        vec!["a".into(), "b".into()],
        0,
        "test".into(),
      )
      .unwrap();
      store.insert_question(q).await.unwrap();
    }
    let transport = FakeTransport::default();

    deliver_quiz(&store, &transport, CHAT, 3).await.unwrap();

    let effects = transport.effects();
    assert_eq!(effects.len(), 1);
    let Effect::Send { text, keyboard, .. } = &effects[0] else {
      panic!("expected a send");
    };
    assert!(text.contains("[1/3]"));

    // The keyboard payload round-trips to the created session.
    let kb = keyboard.as_ref().unwrap();
    let CallbackData::Quiz { session_id, option_index: 0 } =
      CallbackData::decode(&kb.rows[0][0].data)
    else {
      panic!("expected a quiz payload");
    };
    let session = store.get_session(session_id).await.unwrap().unwrap();
    assert_eq!(session.original_count, 3);
    assert_eq!(session.current_index, 0);
  }

  #[tokio::test]
  async fn deliver_quiz_with_an_empty_bank_sends_a_warning() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let transport = FakeTransport::default();

    deliver_quiz(&store, &transport, CHAT, 5).await.unwrap();

    assert_eq!(
      transport.effects(),
      vec![Effect::Send {
        chat_id:  CHAT,
        text:     render::QUIZ_BANK_EMPTY.into(),
        keyboard: None,
      }],
    );
  }

  #[tokio::test]
  async fn deliver_flaw_points_the_poll_and_opens_the_log() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let item = review_item("p1");
    let id = item.item_id;
    store.insert_review_item(item).await.unwrap();
    let transport = FakeTransport::default();

    deliver_flaw(&store, &transport, CHAT).await.unwrap();

    assert_eq!(store.active_review_item().await.unwrap(), Some(id));
    let fetched = store.get_review_item(id).await.unwrap().unwrap();
    assert!(fetched.delivered_at.is_some());

    let effects = transport.effects();
    assert_eq!(effects.len(), 2);
    let Effect::Send { text, .. } = &effects[0] else { panic!() };
    assert!(text.contains("SPOT THE FLAW"));
    let Effect::Poll { correct_index, options, .. } = &effects[1] else {
      panic!("expected a poll");
    };
    // flawed_step_number 2 means option index 1.
    assert_eq!(*correct_index, 1);
    assert_eq!(options.len(), 2);

    // The log row is open and unresolved.
    assert!(store.resolved_daily_outcomes().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn deliver_flaw_falls_back_to_a_revision_round() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let item = review_item("p1");
    let id = item.item_id;
    store.insert_review_item(item).await.unwrap();
    store.mark_item_delivered(id).await.unwrap();
    store.set_review_status(id, ReviewStatus::Caught).await.unwrap();
    let transport = FakeTransport::default();

    deliver_flaw(&store, &transport, CHAT).await.unwrap();

    let effects = transport.effects();
    let Effect::Send { text, .. } = &effects[0] else { panic!() };
    assert!(text.contains("REVISION ROUND"));
    assert_eq!(store.active_review_item().await.unwrap(), Some(id));
  }

  #[tokio::test]
  async fn deliver_flaw_with_an_empty_deck_sends_a_warning() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let transport = FakeTransport::default();

    deliver_flaw(&store, &transport, CHAT).await.unwrap();

    assert_eq!(
      transport.effects(),
      vec![Effect::Send {
        chat_id:  CHAT,
        text:     render::FLAW_DECK_EMPTY.into(),
        keyboard: None,
      }],
    );
  }

  #[tokio::test]
  async fn deliver_graveyard_sends_the_nudge_with_action_buttons() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let item = review_item("the missed one");
    let id = item.item_id;
    store.insert_review_item(item).await.unwrap();
    store.set_review_status(id, ReviewStatus::Missed).await.unwrap();
    let transport = FakeTransport::default();

    deliver_graveyard(&store, &transport, CHAT).await.unwrap();

    let effects = transport.effects();
    let Effect::Send { text, keyboard, .. } = &effects[0] else { panic!() };
    assert!(text.contains("GRAVEYARD"));
    assert!(text.contains("the missed one"));
    let kb = keyboard.as_ref().unwrap();
    assert_eq!(kb.rows[0][0].data, CallbackData::review(id, sprint_core::callback::ReviewAction::GotIt));
    assert_eq!(kb.rows[0][1].data, CallbackData::review(id, sprint_core::callback::ReviewAction::Defer));
  }

  #[tokio::test]
  async fn deliver_graveyard_with_nothing_missed_says_so() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let transport = FakeTransport::default();

    deliver_graveyard(&store, &transport, CHAT).await.unwrap();

    assert_eq!(
      transport.effects(),
      vec![Effect::Send {
        chat_id:  CHAT,
        text:     render::GRAVEYARD_EMPTY.into(),
        keyboard: None,
      }],
    );
  }

  #[tokio::test]
  async fn weekly_report_sends_the_fingerprint() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let item = review_item("p1");
    let id = item.item_id;
    store.insert_review_item(item).await.unwrap();
    store.open_daily_log(id).await.unwrap();
    store.close_daily_log(id, false).await.unwrap();
    let transport = FakeTransport::default();

    weekly_report(&store, &transport, CHAT).await.unwrap();

    let effects = transport.effects();
    let Effect::Send { text, .. } = &effects[0] else { panic!() };
    assert!(text.contains("WEEKLY ERROR FINGERPRINT"));
    assert!(text.contains("Sign Error: missed 1x"));
  }
}
