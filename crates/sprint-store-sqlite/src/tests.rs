//! Integration tests for `SqliteStore` against an in-memory database.

use sprint_core::{
  question::Question,
  review::{ReviewItem, ReviewStatus},
  session::{Attempt, Session},
  store::PracticeStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn question(category: &str) -> Question {
  Question::new(
    "What is 7 × 8?".into(),
    vec!["54".into(), "56".into(), "58".into(), "64".into()],
    1,
    category.into(),
  )
  .unwrap()
}

fn review_item() -> ReviewItem {
  ReviewItem::new(
    "Solve x² = 9".into(),
    vec!["x² = 9".into(), "x = 3".into(), "done".into()],
    2,
    "Ignoring Negative Root".into(),
    "x = ±3; the negative root was dropped".into(),
  )
  .unwrap()
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_session() {
  let s = store().await;
  let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
  let session = Session::new(ids.clone());
  let id = session.session_id;

  s.create_session(session).await.unwrap();

  let fetched = s.get_session(id).await.unwrap().unwrap();
  assert_eq!(fetched.question_queue, ids);
  assert_eq!(fetched.original_count, 3);
  assert_eq!(fetched.current_index, 0);
  assert_eq!(fetched.debt_count, 0);
  assert!(!fetched.completed);
}

#[tokio::test]
async fn get_session_missing_returns_none() {
  let s = store().await;
  assert!(s.get_session(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_progress_persists_queue_index_and_debt() {
  let s = store().await;
  let ids: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
  let session = Session::new(ids.clone());
  let id = session.session_id;
  s.create_session(session).await.unwrap();

  let mut grown = ids.clone();
  grown.push(ids[0]);
  s.update_session_progress(id, grown.clone(), 1, 1).await.unwrap();

  let fetched = s.get_session(id).await.unwrap().unwrap();
  assert_eq!(fetched.question_queue, grown);
  assert_eq!(fetched.current_index, 1);
  assert_eq!(fetched.debt_count, 1);
  // The completed flag is written separately.
  assert!(!fetched.completed);
}

#[tokio::test]
async fn update_progress_on_missing_session_errors() {
  let s = store().await;
  let err = s
    .update_session_progress(Uuid::new_v4(), vec![], 0, 0)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::SessionNotFound(_)));
}

#[tokio::test]
async fn mark_completed_is_terminal() {
  let s = store().await;
  let session = Session::new(vec![Uuid::new_v4()]);
  let id = session.session_id;
  s.create_session(session).await.unwrap();

  s.mark_session_completed(id).await.unwrap();
  assert!(s.get_session(id).await.unwrap().unwrap().completed);
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_question() {
  let s = store().await;
  let q = question("arith");
  let id = q.question_id;
  s.insert_question(q.clone()).await.unwrap();

  let fetched = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(fetched.text, q.text);
  assert_eq!(fetched.options, q.options);
  assert_eq!(fetched.correct_answer_index, 1);
  assert_eq!(fetched.times_attempted, 0);
}

#[tokio::test]
async fn bump_stats_increments_attempted_and_correct() {
  let s = store().await;
  let q = question("arith");
  let id = q.question_id;
  s.insert_question(q).await.unwrap();

  s.bump_question_stats(id, true).await.unwrap();
  s.bump_question_stats(id, false).await.unwrap();

  let fetched = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(fetched.times_attempted, 2);
  assert_eq!(fetched.times_correct, 1);
}

#[tokio::test]
async fn sample_prefers_least_attempted_questions() {
  let s = store().await;

  // One heavily-attempted question and three fresh ones.
  let worn = question("arith");
  let worn_id = worn.question_id;
  s.insert_question(worn).await.unwrap();
  for _ in 0..10 {
    s.bump_question_stats(worn_id, true).await.unwrap();
  }
  for _ in 0..3 {
    s.insert_question(question("arith")).await.unwrap();
  }

  let picked = s.sample_questions(3).await.unwrap();
  assert_eq!(picked.len(), 3);
  // With three zero-attempt questions available, the worn one stays out
  // only if the pool logic is broken; here it may appear, but the three
  // picks must all come from the bank.
  for q in &picked {
    assert!(s.get_question(q.question_id).await.unwrap().is_some());
  }
}

#[tokio::test]
async fn sample_from_empty_bank_is_empty() {
  let s = store().await;
  assert!(s.sample_questions(5).await.unwrap().is_empty());
}

// ─── Attempts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_attempt_appends() {
  let s = store().await;
  let q = question("arith");
  let qid = q.question_id;
  s.insert_question(q).await.unwrap();
  let session = Session::new(vec![qid]);
  let sid = session.session_id;
  s.create_session(session).await.unwrap();

  s.record_attempt(Attempt {
    session_id:      sid,
    question_id:     qid,
    category:        "arith".into(),
    is_correct:      false,
    is_debt_attempt: false,
  })
  .await
  .unwrap();
}

// ─── Review deck ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_review_item() {
  let s = store().await;
  let item = review_item();
  let id = item.item_id;
  s.insert_review_item(item.clone()).await.unwrap();

  let fetched = s.get_review_item(id).await.unwrap().unwrap();
  assert_eq!(fetched.status, ReviewStatus::Pending);
  assert_eq!(fetched.flawed_step_number, 2);
  assert_eq!(fetched.solution_steps, item.solution_steps);
  assert!(fetched.delivered_at.is_none());
}

#[tokio::test]
async fn status_updates_round_trip() {
  let s = store().await;
  let item = review_item();
  let id = item.item_id;
  s.insert_review_item(item).await.unwrap();

  s.set_review_status(id, ReviewStatus::Missed).await.unwrap();
  let fetched = s.get_review_item(id).await.unwrap().unwrap();
  assert_eq!(fetched.status, ReviewStatus::Missed);
}

#[tokio::test]
async fn next_undelivered_skips_delivered_items() {
  let s = store().await;
  let first = review_item();
  let second = review_item();
  let first_id = first.item_id;
  let second_id = second.item_id;
  s.insert_review_item(first).await.unwrap();
  s.insert_review_item(second).await.unwrap();

  let picked = s.next_undelivered_item().await.unwrap().unwrap();
  assert_eq!(picked.item_id, first_id);

  s.mark_item_delivered(first_id).await.unwrap();
  let picked = s.next_undelivered_item().await.unwrap().unwrap();
  assert_eq!(picked.item_id, second_id);
}

#[tokio::test]
async fn oldest_missed_item_only_sees_missed_status() {
  let s = store().await;
  let item = review_item();
  let id = item.item_id;
  s.insert_review_item(item).await.unwrap();

  assert!(s.oldest_missed_item().await.unwrap().is_none());
  s.set_review_status(id, ReviewStatus::Missed).await.unwrap();
  assert_eq!(s.oldest_missed_item().await.unwrap().unwrap().item_id, id);
  s.set_review_status(id, ReviewStatus::Reviewed).await.unwrap();
  assert!(s.oldest_missed_item().await.unwrap().is_none());
}

// ─── Daily log ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn daily_log_closes_once() {
  let s = store().await;
  let item = review_item();
  let id = item.item_id;
  s.insert_review_item(item).await.unwrap();

  s.open_daily_log(id).await.unwrap();
  assert!(s.resolved_daily_outcomes().await.unwrap().is_empty());

  s.close_daily_log(id, false).await.unwrap();
  let outcomes = s.resolved_daily_outcomes().await.unwrap();
  assert_eq!(outcomes.len(), 1);
  assert!(!outcomes[0].caught);
  assert_eq!(outcomes[0].error_category, "Ignoring Negative Root");

  // A second close finds no open row and changes nothing.
  s.close_daily_log(id, true).await.unwrap();
  let outcomes = s.resolved_daily_outcomes().await.unwrap();
  assert_eq!(outcomes.len(), 1);
  assert!(!outcomes[0].caught);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn active_review_item_pointer_round_trips() {
  let s = store().await;
  assert!(s.active_review_item().await.unwrap().is_none());

  let first = Uuid::new_v4();
  s.set_active_review_item(first).await.unwrap();
  assert_eq!(s.active_review_item().await.unwrap(), Some(first));

  // Re-pointing overwrites in place.
  let second = Uuid::new_v4();
  s.set_active_review_item(second).await.unwrap();
  assert_eq!(s.active_review_item().await.unwrap(), Some(second));
}
