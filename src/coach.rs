//! Coaching heuristics
//!
//! Three detectors over newest-first history and the active plan. They are
//! pure: callers pass "today" explicitly so the checks are reproducible.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{HistoryEntry, WorkoutPlan};

/// ---------------------------------------------------------------------------
/// Thresholds
/// ---------------------------------------------------------------------------

const INACTIVITY_DAYS: i64 = 3;
const SKIP_WINDOW_DAYS: i64 = 7;
const DELOAD_MIN_HISTORY: usize = 12;
const DELOAD_WINDOW: usize = 3;

/// ---------------------------------------------------------------------------
/// Signals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CoachSignal {
  /// Main lifts have stopped moving; suggest a lighter week
  Deload,
  /// No workout for more than three days
  Inactivity { days: i64 },
  /// A planned training day passed without a log
  Skipped {
    skipped_day_index: usize,
    skipped_day_name: String,
    last_day_name: String,
  },
}

/// Whole days between the newest entry and `today`
pub fn days_since_last_workout(history: &[HistoryEntry], today: NaiveDate) -> Option<i64> {
  history.first().map(|entry| (today - entry.id).num_days())
}

pub fn detect_inactivity(history: &[HistoryEntry], today: NaiveDate) -> Option<CoachSignal> {
  let days = days_since_last_workout(history, today)?;
  (days > INACTIVITY_DAYS).then_some(CoachSignal::Inactivity { days })
}

/// First planned training day between the last workout and today
pub fn detect_skipped_workout(
  history: &[HistoryEntry],
  plan: &WorkoutPlan,
  today: NaiveDate,
) -> Option<CoachSignal> {
  let last = history.first()?;
  let diff = (today - last.id).num_days();
  if diff <= 1 || diff >= SKIP_WINDOW_DAYS {
    return None;
  }

  // Plans start on Monday
  let last_index = last.id.weekday().num_days_from_monday() as usize;
  let last_day_name = plan.day(last_index).map(|d| d.name.clone()).unwrap_or_default();

  (1..diff as usize)
    .map(|offset| (last_index + offset) % 7)
    .find_map(|index| {
      let day = plan.day(index)?;
      (!day.is_rest_day()).then(|| CoachSignal::Skipped {
        skipped_day_index: index,
        skipped_day_name: day.name.clone(),
        last_day_name: last_day_name.clone(),
      })
    })
}

/// First exercise of every training day, de-duplicated, in plan order
pub fn main_lifts(plan: &WorkoutPlan) -> Vec<&str> {
  let mut lifts: Vec<&str> = Vec::new();
  for day in &plan.days {
    if let Some(first) = day.exercises.first() {
      if !lifts.contains(&first.name.as_str()) {
        lifts.push(&first.name);
      }
    }
  }
  lifts
}

/// A lift is stalled when its last three volumes, read oldest to newest,
/// never went down and the oldest was non-zero.
fn is_stalled(history: &[HistoryEntry], lift: &str) -> bool {
  let volumes: Vec<f64> = history
    .iter()
    .filter_map(|entry| entry.exercise(lift))
    .take(DELOAD_WINDOW)
    .map(|ex| ex.volume)
    .collect();

  match volumes.as_slice() {
    [newest, middle, oldest] => *oldest > 0.0 && oldest <= middle && middle <= newest,
    _ => false,
  }
}

pub fn detect_deload(history: &[HistoryEntry], plan: &WorkoutPlan) -> Option<CoachSignal> {
  if history.len() < DELOAD_MIN_HISTORY {
    return None;
  }
  let lifts = main_lifts(plan);
  if lifts.is_empty() {
    return None;
  }

  let stalled = lifts.iter().filter(|lift| is_stalled(history, lift)).count();
  tracing::debug!(stalled, lifts = lifts.len(), "Checked main lifts for plateau");

  // Real-number comparison: 1 of 3 stalled is not enough, 2 of 3 is
  (stalled as f64 >= lifts.len() as f64 / 2.0).then_some(CoachSignal::Deload)
}

/// Run every detector. Inactivity suppresses the skipped-day check.
pub fn generate_suggestions(
  history: &[HistoryEntry],
  plan: Option<&WorkoutPlan>,
  today: NaiveDate,
) -> Vec<CoachSignal> {
  let mut signals = Vec::new();

  if let Some(signal) = plan.and_then(|p| detect_deload(history, p)) {
    signals.push(signal);
  }

  if let Some(signal) = detect_inactivity(history, today) {
    signals.push(signal);
  } else if let Some(signal) = plan.and_then(|p| detect_skipped_workout(history, p, today)) {
    signals.push(signal);
  }

  if !signals.is_empty() {
    tracing::info!(count = signals.len(), "Coach suggestions generated");
  }
  signals
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
