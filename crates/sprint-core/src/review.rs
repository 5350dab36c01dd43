//! Review deck — flaw-spotting problems and their forward-only lifecycle.
//!
//! Items move `pending → caught | missed` when the daily poll vote lands,
//! and `missed → reviewed` when the user clears them from the graveyard.
//! No transition ever moves backwards and no item is ever deleted. The
//! transition functions here are pure; the caller persists the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{callback::ReviewAction, Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of a review item, strictly forward-moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
  /// Delivered (or awaiting delivery); no vote has landed yet.
  Pending,
  /// The user spotted the flawed step.
  Caught,
  /// The user voted for the wrong step; the item sits in the graveyard.
  Missed,
  /// Re-confirmed from the graveyard.
  Reviewed,
}

impl ReviewStatus {
  /// A poll vote can no longer move this item.
  pub fn is_resolved(&self) -> bool {
    !matches!(self, Self::Pending)
  }
}

// ─── Review item ─────────────────────────────────────────────────────────────

/// A flaw-spotting problem: a worked solution with exactly one flawed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
  pub item_id:            Uuid,
  pub problem:            String,
  /// Worked solution steps, in order; these become the poll options.
  pub solution_steps:     Vec<String>,
  /// One-based index into `solution_steps` of the flawed step.
  pub flawed_step_number: u32,
  pub error_category:     String,
  pub explanation:        String,
  pub status:             ReviewStatus,
  pub delivered_at:       Option<DateTime<Utc>>,
}

impl ReviewItem {
  /// Build a new deck entry in `Pending` status, validating the step set.
  pub fn new(
    problem: String,
    solution_steps: Vec<String>,
    flawed_step_number: u32,
    error_category: String,
    explanation: String,
  ) -> Result<Self> {
    if solution_steps.is_empty() {
      return Err(Error::NoSolutionSteps);
    }
    if flawed_step_number == 0
      || flawed_step_number as usize > solution_steps.len()
    {
      return Err(Error::FlawedStepOutOfRange {
        step:  flawed_step_number,
        count: solution_steps.len(),
      });
    }
    Ok(Self {
      item_id: Uuid::new_v4(),
      problem,
      solution_steps,
      flawed_step_number,
      error_category,
      explanation,
      status: ReviewStatus::Pending,
      delivered_at: None,
    })
  }

  /// The zero-based poll option index a correct vote must select.
  pub fn correct_option_index(&self) -> usize {
    self.flawed_step_number.saturating_sub(1) as usize
  }

  /// Apply the poll-capture machine: `pending → caught | missed`.
  ///
  /// Pure — returns the transition without mutating. A second delivery of
  /// the same vote event lands on a resolved item and no-ops.
  pub fn resolve_vote(&self, chosen_index: usize) -> PollResolution {
    if self.status.is_resolved() {
      return PollResolution::AlreadyResolved;
    }
    PollResolution::Resolved {
      caught: chosen_index == self.correct_option_index(),
    }
  }

  /// Apply a graveyard action: `missed → reviewed` on `got_it`, a self-loop
  /// on defer. Any status other than `missed` means another interaction
  /// already advanced the item.
  pub fn apply_graveyard(&self, action: ReviewAction) -> GraveyardResolution {
    if self.status != ReviewStatus::Missed {
      return GraveyardResolution::AlreadyResolved;
    }
    match action {
      ReviewAction::GotIt => GraveyardResolution::Cleared,
      ReviewAction::Defer => GraveyardResolution::Deferred,
    }
  }
}

// ─── Transition outcomes ─────────────────────────────────────────────────────

/// Outcome of applying a poll vote to a review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResolution {
  Resolved { caught: bool },
  /// The item was already caught, missed, or reviewed; the event is a
  /// duplicate delivery and must not re-apply.
  AlreadyResolved,
}

/// Outcome of applying a graveyard button tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraveyardResolution {
  /// `got_it` on a missed item: status advances to `Reviewed`.
  Cleared,
  /// Defer on a missed item: status stays `Missed`, but the user still
  /// gets a confirmation.
  Deferred,
  AlreadyResolved,
}

// ─── Daily log ───────────────────────────────────────────────────────────────

/// One row of the daily delivery log. `caught` stays unset until the poll
/// vote resolves the item; it is then written at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLogEntry {
  pub problem_id: Uuid,
  pub logged_at:  DateTime<Utc>,
  pub caught:     Option<bool>,
}

/// A resolved daily outcome, as aggregated for the weekly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
  pub error_category: String,
  pub caught:         bool,
}
