//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Ordered sequences (the
//! question queue, option lists, solution steps) are stored as compact
//! JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use sprint_core::{
  question::Question,
  review::{ReviewItem, ReviewStatus},
  session::Session,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Uuid sequences ───────────────────────────────────────────────────────────

pub fn encode_id_queue(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_id_queue(s: &str) -> Result<Vec<Uuid>> {
  Ok(serde_json::from_str(s)?)
}

// ─── String sequences ─────────────────────────────────────────────────────────

pub fn encode_string_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_string_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── ReviewStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(status: ReviewStatus) -> &'static str {
  match status {
    ReviewStatus::Pending => "pending",
    ReviewStatus::Caught => "caught",
    ReviewStatus::Missed => "missed",
    ReviewStatus::Reviewed => "reviewed",
  }
}

pub fn decode_status(s: &str) -> Result<ReviewStatus> {
  match s {
    "pending" => Ok(ReviewStatus::Pending),
    "caught" => Ok(ReviewStatus::Caught),
    "missed" => Ok(ReviewStatus::Missed),
    "reviewed" => Ok(ReviewStatus::Reviewed),
    other => Err(Error::Decode(format!("unknown review status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub session_id:     String,
  pub question_queue: String,
  pub current_index:  i64,
  pub original_count: i64,
  pub debt_count:     i64,
  pub completed:      bool,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id:     decode_uuid(&self.session_id)?,
      question_queue: decode_id_queue(&self.question_queue)?,
      current_index:  self.current_index as usize,
      original_count: self.original_count as usize,
      debt_count:     self.debt_count as u32,
      completed:      self.completed,
    })
  }
}

/// Raw strings read directly from a `questions` row.
pub struct RawQuestion {
  pub question_id:          String,
  pub question_text:        String,
  pub options:              String,
  pub correct_answer_index: i64,
  pub category:             String,
  pub times_attempted:      i64,
  pub times_correct:        i64,
}

impl RawQuestion {
  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      question_id:          decode_uuid(&self.question_id)?,
      text:                 self.question_text,
      options:              decode_string_list(&self.options)?,
      correct_answer_index: self.correct_answer_index as usize,
      category:             self.category,
      times_attempted:      self.times_attempted as u32,
      times_correct:        self.times_correct as u32,
    })
  }
}

/// Raw strings read directly from a `review_items` row.
pub struct RawReviewItem {
  pub item_id:            String,
  pub problem:            String,
  pub solution_steps:     String,
  pub flawed_step_number: i64,
  pub error_category:     String,
  pub explanation:        String,
  pub status:             String,
  pub delivered_at:       Option<String>,
}

impl RawReviewItem {
  pub fn into_item(self) -> Result<ReviewItem> {
    Ok(ReviewItem {
      item_id:            decode_uuid(&self.item_id)?,
      problem:            self.problem,
      solution_steps:     decode_string_list(&self.solution_steps)?,
      flawed_step_number: self.flawed_step_number as u32,
      error_category:     self.error_category,
      explanation:        self.explanation,
      status:             decode_status(&self.status)?,
      delivered_at:       self.delivered_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
