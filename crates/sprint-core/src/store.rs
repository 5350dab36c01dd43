//! The `PracticeStore` trait.
//!
//! Implemented by storage backends (e.g. `sprint-store-sqlite`). The
//! webhook layer depends on this abstraction, not on any concrete backend.
//! The contract is deliberately narrow: point lookups, point updates,
//! append-only inserts, and one key/value read for the active review item.
//! No transactions, joins, or batch operations.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  question::Question,
  review::{ReviewItem, ReviewOutcome, ReviewStatus},
  session::{Attempt, Session},
};

pub trait PracticeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Persist a freshly-created session.
  fn create_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a session by id. Returns `None` if not found.
  fn get_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Persist the queue/index/debt mutation produced by an engine advance.
  /// The completed flag is written separately by
  /// [`mark_session_completed`](Self::mark_session_completed).
  fn update_session_progress(
    &self,
    id: Uuid,
    queue: Vec<Uuid>,
    current_index: usize,
    debt_count: u32,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Terminal write, issued only after the engine signals completion.
  fn mark_session_completed(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Add a question to the bank.
  fn insert_question(
    &self,
    question: Question,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a question by id. Returns `None` if not found.
  fn get_question(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + '_;

  /// Up to `count` questions biased toward the least-attempted, in random
  /// order.
  fn sample_questions(
    &self,
    count: usize,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;

  /// `times_attempted += 1`, plus `times_correct += 1` iff `correct`.
  fn bump_question_stats(
    &self,
    id: Uuid,
    correct: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Attempt log — append-only ─────────────────────────────────────────

  /// Append one attempt record. Never updated afterwards.
  fn record_attempt(
    &self,
    attempt: Attempt,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Review deck ───────────────────────────────────────────────────────

  /// Add a flaw problem to the deck, in `Pending` status.
  fn insert_review_item(
    &self,
    item: ReviewItem,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a review item by id. Returns `None` if not found.
  fn get_review_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ReviewItem>, Self::Error>> + Send + '_;

  /// Point status update; the forward-only transition is decided by the
  /// caller (`sprint_core::review`).
  fn set_review_status(
    &self,
    id: Uuid,
    status: ReviewStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Oldest pending item never delivered before.
  fn next_undelivered_item(
    &self,
  ) -> impl Future<Output = Result<Option<ReviewItem>, Self::Error>> + Send + '_;

  /// Oldest caught item, for revision rounds once the deck is exhausted.
  fn oldest_caught_item(
    &self,
  ) -> impl Future<Output = Result<Option<ReviewItem>, Self::Error>> + Send + '_;

  /// Oldest missed item awaiting graveyard clearance.
  fn oldest_missed_item(
    &self,
  ) -> impl Future<Output = Result<Option<ReviewItem>, Self::Error>> + Send + '_;

  /// Stamp `delivered_at`; first delivery only.
  fn mark_item_delivered(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Daily log ─────────────────────────────────────────────────────────

  /// Open a daily-log row for `problem_id` with `caught` unset.
  fn open_daily_log(
    &self,
    problem_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Close the daily-log row for `problem_id`. At most one close per
  /// problem; the caller's status guard enforces it.
  fn close_daily_log(
    &self,
    problem_id: Uuid,
    caught: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All resolved daily outcomes with their error category, for the weekly
  /// report.
  fn resolved_daily_outcomes(
    &self,
  ) -> impl Future<Output = Result<Vec<ReviewOutcome>, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// The id of the review item the next poll vote resolves, if one is set.
  fn active_review_item(
    &self,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  /// Point the next poll vote at `id`.
  fn set_active_review_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
