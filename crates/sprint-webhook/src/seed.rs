//! JSON seed import for the question bank and flaw deck.
//!
//! Records are validated through the core constructors before insertion; a
//! bad record fails the whole import rather than being skipped silently.

use serde::Deserialize;
use sprint_core::{question::Question, review::ReviewItem, store::PracticeStore};

use crate::error::Error;

/// The on-disk seed format. Both sections are optional.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
  #[serde(default)]
  pub questions:    Vec<SeedQuestion>,
  #[serde(default)]
  pub review_items: Vec<SeedReviewItem>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuestion {
  pub text:                 String,
  pub options:              Vec<String>,
  pub correct_answer_index: usize,
  pub category:             String,
}

#[derive(Debug, Deserialize)]
pub struct SeedReviewItem {
  pub problem:            String,
  pub solution_steps:     Vec<String>,
  pub flawed_step_number: u32,
  pub error_category:     String,
  pub explanation:        String,
}

/// Insert every record in `seed`. Returns the `(questions, review_items)`
/// counts inserted.
pub async fn apply<S>(store: &S, seed: SeedFile) -> Result<(usize, usize), Error>
where
  S: PracticeStore,
{
  let mut questions = 0;
  for record in seed.questions {
    let question = Question::new(
      record.text,
      record.options,
      record.correct_answer_index,
      record.category,
    )?;
    store.insert_question(question).await.map_err(Error::store)?;
    questions += 1;
  }

  let mut items = 0;
  for record in seed.review_items {
    let item = ReviewItem::new(
      record.problem,
      record.solution_steps,
      record.flawed_step_number,
      record.error_category,
      record.explanation,
    )?;
    store.insert_review_item(item).await.map_err(Error::store)?;
    items += 1;
  }

  Ok((questions, items))
}

#[cfg(test)]
mod tests {
  use super::*;
  use sprint_store_sqlite::SqliteStore;

  #[tokio::test]
  async fn apply_inserts_both_sections() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let seed: SeedFile = serde_json::from_str(
      r#"{
        "questions": [
          {
            "text": "What is 7 × 8?",
            "options": ["54", "56", "58", "64"],
            "correct_answer_index": 1,
            "category": "arith"
          }
        ],
        "review_items": [
          {
            "problem": "Solve x² = 9",
            "solution_steps": ["x² = 9", "x = 3"],
            "flawed_step_number": 2,
            "error_category": "Ignoring Negative Root",
            "explanation": "x = ±3"
          }
        ]
      }"#,
    )
    .unwrap();

    let (questions, items) = apply(&store, seed).await.unwrap();
    assert_eq!((questions, items), (1, 1));
    assert_eq!(store.sample_questions(5).await.unwrap().len(), 1);
    assert!(store.next_undelivered_item().await.unwrap().is_some());
  }

  #[tokio::test]
  async fn invalid_record_fails_the_import() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let seed: SeedFile = serde_json::from_str(
      r#"{
        "questions": [
          {
            "text": "?",
            "options": ["a", "b"],
            "correct_answer_index": 5,
            "category": "arith"
          }
        ]
      }"#,
    )
    .unwrap();

    let err = apply(&store, seed).await.unwrap_err();
    assert!(matches!(err, Error::Seed(_)));
  }
}
