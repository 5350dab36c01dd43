//! [`SqliteStore`] — the SQLite implementation of [`PracticeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sprint_core::{
  question::Question,
  review::{ReviewItem, ReviewOutcome, ReviewStatus},
  session::{Attempt, Session},
  store::PracticeStore,
};

use crate::{
  encode::{
    decode_uuid, encode_dt, encode_id_queue, encode_status,
    encode_string_list, encode_uuid, RawQuestion, RawReviewItem, RawSession,
  },
  schema::SCHEMA,
  Error, Result,
};

/// The settings key holding the review item the next poll vote resolves.
const ACTIVE_ITEM_KEY: &str = "todays_problem_id";

const SESSION_COLUMNS: &str =
  "session_id, question_queue, current_index, original_count, debt_count, completed";

const QUESTION_COLUMNS: &str =
  "question_id, question_text, options, correct_answer_index, category, \
   times_attempted, times_correct";

const REVIEW_COLUMNS: &str =
  "item_id, problem, solution_steps, flawed_step_number, error_category, \
   explanation, status, delivered_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A practice store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row SELECT for a review item.
  async fn review_item_where(
    &self,
    clause: &'static str,
    params: Vec<String>,
  ) -> Result<Option<ReviewItem>> {
    let raw: Option<RawReviewItem> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM review_items {clause}"),
            rusqlite::params_from_iter(params),
            |row| {
              Ok(RawReviewItem {
                item_id:            row.get(0)?,
                problem:            row.get(1)?,
                solution_steps:     row.get(2)?,
                flawed_step_number: row.get(3)?,
                error_category:     row.get(4)?,
                explanation:        row.get(5)?,
                status:             row.get(6)?,
                delivered_at:       row.get(7)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawReviewItem::into_item).transpose()
  }
}

// ─── PracticeStore impl ──────────────────────────────────────────────────────

impl PracticeStore for SqliteStore {
  type Error = Error;

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, session: Session) -> Result<()> {
    let id_str    = encode_uuid(session.session_id);
    let queue_str = encode_id_queue(&session.question_queue)?;
    let at_str    = encode_dt(Utc::now());
    let original  = session.original_count as i64;
    let index     = session.current_index as i64;
    let debt      = i64::from(session.debt_count);
    let completed = session.completed;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (
             session_id, question_queue, current_index, original_count,
             debt_count, completed, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, queue_str, index, original, debt, completed, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?1"),
            rusqlite::params![id_str],
            |row| {
              Ok(RawSession {
                session_id:     row.get(0)?,
                question_queue: row.get(1)?,
                current_index:  row.get(2)?,
                original_count: row.get(3)?,
                debt_count:     row.get(4)?,
                completed:      row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn update_session_progress(
    &self,
    id: Uuid,
    queue: Vec<Uuid>,
    current_index: usize,
    debt_count: u32,
  ) -> Result<()> {
    let id_str    = encode_uuid(id);
    let queue_str = encode_id_queue(&queue)?;
    let index     = current_index as i64;
    let debt      = i64::from(debt_count);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sessions
           SET question_queue = ?2, current_index = ?3, debt_count = ?4
           WHERE session_id = ?1",
          rusqlite::params![id_str, queue_str, index, debt],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::SessionNotFound(id));
    }
    Ok(())
  }

  async fn mark_session_completed(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sessions SET completed = 1 WHERE session_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::SessionNotFound(id));
    }
    Ok(())
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn insert_question(&self, question: Question) -> Result<()> {
    let id_str      = encode_uuid(question.question_id);
    let options_str = encode_string_list(&question.options)?;
    let correct     = question.correct_answer_index as i64;
    let attempted   = i64::from(question.times_attempted);
    let right       = i64::from(question.times_correct);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO questions (
             question_id, question_text, options, correct_answer_index,
             category, times_attempted, times_correct
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            question.text,
            options_str,
            correct,
            question.category,
            attempted,
            right,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawQuestion> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE question_id = ?1"),
            rusqlite::params![id_str],
            |row| {
              Ok(RawQuestion {
                question_id:          row.get(0)?,
                question_text:        row.get(1)?,
                options:              row.get(2)?,
                correct_answer_index: row.get(3)?,
                category:             row.get(4)?,
                times_attempted:      row.get(5)?,
                times_correct:        row.get(6)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawQuestion::into_question).transpose()
  }

  async fn sample_questions(&self, count: usize) -> Result<Vec<Question>> {
    let limit = count as i64;

    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        // Least-attempted pool first, then shuffle store-side so the pick
        // is not always the same front of the bank.
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUESTION_COLUMNS} FROM (
             SELECT * FROM questions ORDER BY times_attempted ASC LIMIT 50
           ) ORDER BY RANDOM() LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawQuestion {
              question_id:          row.get(0)?,
              question_text:        row.get(1)?,
              options:              row.get(2)?,
              correct_answer_index: row.get(3)?,
              category:             row.get(4)?,
              times_attempted:      row.get(5)?,
              times_correct:        row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }

  async fn bump_question_stats(&self, id: Uuid, correct: bool) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE questions
           SET times_attempted = times_attempted + 1,
               times_correct   = times_correct + (CASE WHEN ?2 THEN 1 ELSE 0 END)
           WHERE question_id = ?1",
          rusqlite::params![id_str, correct],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::QuestionNotFound(id));
    }
    Ok(())
  }

  // ── Attempt log — append-only ─────────────────────────────────────────────

  async fn record_attempt(&self, attempt: Attempt) -> Result<()> {
    let session_str  = encode_uuid(attempt.session_id);
    let question_str = encode_uuid(attempt.question_id);
    let at_str       = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attempts (
             session_id, question_id, category, is_correct, is_debt_attempt,
             recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            session_str,
            question_str,
            attempt.category,
            attempt.is_correct,
            attempt.is_debt_attempt,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Review deck ───────────────────────────────────────────────────────────

  async fn insert_review_item(&self, item: ReviewItem) -> Result<()> {
    let id_str     = encode_uuid(item.item_id);
    let steps_str  = encode_string_list(&item.solution_steps)?;
    let step       = i64::from(item.flawed_step_number);
    let status_str = encode_status(item.status).to_owned();
    let at_str     = encode_dt(Utc::now());
    let delivered  = item.delivered_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO review_items (
             item_id, problem, solution_steps, flawed_step_number,
             error_category, explanation, status, created_at, delivered_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            item.problem,
            steps_str,
            step,
            item.error_category,
            item.explanation,
            status_str,
            at_str,
            delivered,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_review_item(&self, id: Uuid) -> Result<Option<ReviewItem>> {
    self
      .review_item_where("WHERE item_id = ?1", vec![encode_uuid(id)])
      .await
  }

  async fn set_review_status(&self, id: Uuid, status: ReviewStatus) -> Result<()> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE review_items SET status = ?2 WHERE item_id = ?1",
          rusqlite::params![id_str, status_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ReviewItemNotFound(id));
    }
    Ok(())
  }

  async fn next_undelivered_item(&self) -> Result<Option<ReviewItem>> {
    self
      .review_item_where(
        "WHERE status = 'pending' AND delivered_at IS NULL
         ORDER BY created_at ASC, rowid ASC LIMIT 1",
        Vec::new(),
      )
      .await
  }

  async fn oldest_caught_item(&self) -> Result<Option<ReviewItem>> {
    self
      .review_item_where(
        "WHERE status = 'caught' ORDER BY delivered_at ASC, rowid ASC LIMIT 1",
        Vec::new(),
      )
      .await
  }

  async fn oldest_missed_item(&self) -> Result<Option<ReviewItem>> {
    self
      .review_item_where(
        "WHERE status = 'missed' ORDER BY delivered_at ASC, rowid ASC LIMIT 1",
        Vec::new(),
      )
      .await
  }

  async fn mark_item_delivered(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE review_items SET delivered_at = ?2 WHERE item_id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ReviewItemNotFound(id));
    }
    Ok(())
  }

  // ── Daily log ─────────────────────────────────────────────────────────────

  async fn open_daily_log(&self, problem_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(problem_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO daily_log (problem_id, logged_at) VALUES (?1, ?2)",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn close_daily_log(&self, problem_id: Uuid, caught: bool) -> Result<()> {
    let id_str = encode_uuid(problem_id);

    // Zero rows changed is fine: the caller's status guard already decides
    // whether a close may happen; an unmatched close is a stale duplicate.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE daily_log SET caught = ?2
           WHERE problem_id = ?1 AND caught IS NULL",
          rusqlite::params![id_str, caught],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn resolved_daily_outcomes(&self) -> Result<Vec<ReviewOutcome>> {
    let rows: Vec<(String, bool)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT r.error_category, d.caught
           FROM daily_log d
           JOIN review_items r ON r.item_id = d.problem_id
           WHERE d.caught IS NOT NULL
           ORDER BY d.logged_at ASC",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(error_category, caught)| ReviewOutcome { error_category, caught })
        .collect(),
    )
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn active_review_item(&self) -> Result<Option<Uuid>> {
    let value: Option<String> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            rusqlite::params![ACTIVE_ITEM_KEY],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    value.as_deref().map(decode_uuid).transpose()
  }

  async fn set_active_review_item(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![ACTIVE_ITEM_KEY, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
