//! Message texts and keyboards. Every builder here is a pure function of
//! its inputs; nothing talks to a store or a transport.

use sprint_core::{
  callback::{CallbackData, ReviewAction},
  review::ReviewOutcome,
  transport::{Button, Keyboard},
};
use uuid::Uuid;

// ─── Notices ─────────────────────────────────────────────────────────────────

pub const ACK_CORRECT: &str = "✅ Correct!";
pub const ACK_WRONG: &str = "❌ Wrong — added to debt queue!";
pub const SESSION_EXPIRED: &str = "Session expired.";
pub const QUESTION_LOAD_ERROR: &str = "Error loading question.";
pub const NEXT_QUESTION_LOAD_ERROR: &str = "Error loading next question.";
pub const ALREADY_RESOLVED: &str = "Already resolved.";

pub const GRAVEYARD_CLEARED: &str = "✅ Cleared. Out of the graveyard.";
pub const GRAVEYARD_DEFERRED: &str = "🪦 Still foggy. It stays in review.";
pub const GRAVEYARD_EMPTY: &str =
  "🪦 Graveyard is empty. You've caught everything so far.";

pub const QUIZ_BANK_EMPTY: &str =
  "⚠️ Question bank is empty. Nothing to deliver.";
pub const FLAW_DECK_EMPTY: &str =
  "⚠️ Problem bank is empty. Add new flaw problems to the deck.";

pub const FLAW_HEADER: &str = "🔍 *SPOT THE FLAW*\n\n";
pub const REVISION_HEADER: &str = "📚 *REVISION ROUND*\n\n\
  You caught this before. Still remember why the flaw was where it was?\n\n";
pub const FLAW_POLL_QUESTION: &str = "Which step contains the logical flaw?";

// ─── Quiz prompts ────────────────────────────────────────────────────────────

/// In-progress prompt: progress tag, optional debt and will-return
/// annotations, then the question text. `next_index` is zero-based.
pub fn prompt(
  next_index: usize,
  total: usize,
  debt_count: u32,
  last_was_wrong: bool,
  question_text: &str,
) -> String {
  let progress = format!("[{}/{}]", next_index + 1, total);
  let debt_note = if debt_count > 0 {
    format!("_Debt queue: +{debt_count}_ ⚠️\n\n")
  } else {
    String::new()
  };
  let wrong_note = if last_was_wrong {
    "_❌ That one will return. Keep going._\n\n"
  } else {
    ""
  };
  format!("⚡ *SPRINT* {progress}\n\n{debt_note}{wrong_note}{question_text}")
}

/// Completion summary — a pure function of the three final counts.
pub fn summary(original_count: usize, debt_count: u32, total_answered: usize) -> String {
  let mut text =
    format!("🏁 *Sprint Complete!*\n\nOriginal questions: {original_count}\n");
  if debt_count > 0 {
    text.push_str(&format!(
      "Debt repaid: {debt_count} wrong answer(s) → {debt_count} extra question(s)\n"
    ));
    text.push_str(&format!("Total answered: {total_answered}\n\n"));
    text.push_str("_Each wrong answer cost you an extra question. Tomorrow, go clean._");
  } else {
    text.push_str("✨ *Perfect run. Zero debt. Go get some sleep.*");
  }
  text
}

/// Option keyboard: buttons in option order, two per row, payloads carrying
/// the session id and option position.
pub fn option_keyboard(session_id: Uuid, options: &[String]) -> Keyboard {
  Keyboard::two_per_row(
    options
      .iter()
      .enumerate()
      .map(|(index, option)| Button {
        label: option.clone(),
        data:  CallbackData::quiz(session_id, index),
      })
      .collect(),
  )
}

// ─── Review messages ─────────────────────────────────────────────────────────

pub fn poll_confirmation(caught: bool) -> String {
  if caught {
    "🎯 Caught. Logged for today.".into()
  } else {
    "⚰️ Missed. It goes to the graveyard.".into()
  }
}

pub fn flaw_problem_message(header: &str, problem: &str) -> String {
  format!("{header}*Problem:*\n{problem}")
}

pub fn flaw_poll_explanation(error_category: &str, explanation: &str) -> String {
  format!("Trap: {error_category}\n\n{explanation}")
}

pub fn graveyard_prompt(problem: &str) -> String {
  format!(
    "⚰️ *GRAVEYARD*\n\nYou missed this one before.\n\n*Problem:* {problem}\n\n\
     Don't solve it. Just recall the trap mentally."
  )
}

pub fn graveyard_keyboard(item_id: Uuid) -> Keyboard {
  Keyboard::two_per_row(vec![
    Button {
      label: "Got it".into(),
      data:  CallbackData::review(item_id, ReviewAction::GotIt),
    },
    Button {
      label: "Still foggy".into(),
      data:  CallbackData::review(item_id, ReviewAction::Defer),
    },
  ])
}

// ─── Weekly report ───────────────────────────────────────────────────────────

/// The caught/missed fingerprint over all resolved daily outcomes.
pub fn weekly_report(outcomes: &[ReviewOutcome]) -> String {
  if outcomes.is_empty() {
    return "No data yet for weekly report.".into();
  }

  let caught: Vec<&ReviewOutcome> = outcomes.iter().filter(|o| o.caught).collect();
  let missed: Vec<&ReviewOutcome> = outcomes.iter().filter(|o| !o.caught).collect();

  let mut text = String::from("📊 *WEEKLY ERROR FINGERPRINT*\n\n");
  text.push_str(&format!(
    "Attempted: {} | Caught: {} ✅ | Missed: {} ❌\n",
    outcomes.len(),
    caught.len(),
    missed.len(),
  ));

  let missed_counts = count_by_category(&missed);
  if !missed_counts.is_empty() {
    text.push_str("\n*Your Blind Spots:*\n");
    for (category, count) in &missed_counts {
      text.push_str(&format!("  • {category}: missed {count}x\n"));
    }
  }

  let caught_counts = count_by_category(&caught);
  if !caught_counts.is_empty() {
    text.push_str("\n*Your Strengths:*\n");
    for (category, count) in caught_counts.iter().take(3) {
      text.push_str(&format!("  • {category}: caught {count}x\n"));
    }
  }

  if let Some((worst, _)) = missed_counts.first() {
    text.push_str(&format!("\n🎯 *Fix this week:* {worst}"));
  }

  text
}

/// Per-category counts, most frequent first; ties break alphabetically so
/// the report is stable.
fn count_by_category(outcomes: &[&ReviewOutcome]) -> Vec<(String, usize)> {
  let mut counts: std::collections::BTreeMap<&str, usize> =
    std::collections::BTreeMap::new();
  for outcome in outcomes {
    *counts.entry(outcome.error_category.as_str()).or_default() += 1;
  }
  let mut counts: Vec<(String, usize)> = counts
    .into_iter()
    .map(|(category, count)| (category.to_owned(), count))
    .collect();
  counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  counts
}

#[cfg(test)]
mod tests {
  use super::*;
  use sprint_core::callback::CallbackData;

  #[test]
  fn summary_with_debt_reports_all_three_counts() {
    let text = summary(3, 2, 5);
    assert!(text.contains("Original questions: 3"));
    assert!(text.contains("Debt repaid: 2"));
    assert!(text.contains("Total answered: 5"));
  }

  #[test]
  fn summary_without_debt_is_a_clean_run() {
    let text = summary(5, 0, 5);
    assert!(text.contains("Perfect run"));
    assert!(!text.contains("Debt repaid"));
  }

  #[test]
  fn prompt_counts_from_one_and_annotates_debt() {
    let text = prompt(3, 7, 2, true, "What is 7 × 8?");
    assert!(text.contains("[4/7]"));
    assert!(text.contains("Debt queue: +2"));
    assert!(text.contains("That one will return"));
    assert!(text.ends_with("What is 7 × 8?"));
  }

  #[test]
  fn prompt_without_debt_has_no_annotations() {
    let text = prompt(0, 5, 0, false, "q");
    assert!(!text.contains("Debt queue"));
    assert!(!text.contains("will return"));
  }

  #[test]
  fn option_keyboard_payloads_carry_positions_not_text() {
    let id = uuid::Uuid::new_v4();
    let kb = option_keyboard(id, &["54".into(), "56".into(), "58".into()]);
    assert_eq!(kb.rows.len(), 2);
    assert_eq!(kb.rows[0][1].label, "56");
    assert_eq!(
      CallbackData::decode(&kb.rows[0][1].data),
      CallbackData::Quiz { session_id: id, option_index: 1 },
    );
    assert_eq!(
      CallbackData::decode(&kb.rows[1][0].data),
      CallbackData::Quiz { session_id: id, option_index: 2 },
    );
  }

  #[test]
  fn weekly_report_orders_blind_spots_by_frequency() {
    let outcome = |category: &str, caught| sprint_core::review::ReviewOutcome {
      error_category: category.into(),
      caught,
    };
    let outcomes = vec![
      outcome("Sign Error", false),
      outcome("Sign Error", false),
      outcome("Misread Constraint", false),
      outcome("Ratio Misapplied", true),
    ];
    let text = weekly_report(&outcomes);
    assert!(text.contains("Attempted: 4 | Caught: 1 ✅ | Missed: 3 ❌"));
    let sign = text.find("Sign Error: missed 2x").unwrap();
    let misread = text.find("Misread Constraint: missed 1x").unwrap();
    assert!(sign < misread);
    assert!(text.contains("🎯 *Fix this week:* Sign Error"));
  }

  #[test]
  fn weekly_report_with_no_outcomes_says_so() {
    assert_eq!(weekly_report(&[]), "No data yet for weekly report.");
  }
}
