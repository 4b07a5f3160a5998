//! Startup and post-restore data repair

use chrono::{DateTime, Utc};

use crate::estimator::estimate_1rm;
use crate::models::HistoryEntry;

/// Bring stored history up to the current invariants.
///
/// Recomputes exercise volumes and entry totals, fills e1RM on sets saved
/// before it was tracked, and gives undated entries a timestamp from their
/// day id. Returns true when anything changed and history should be saved.
pub fn repair_history(history: &mut [HistoryEntry]) -> bool {
  let mut changed = false;
  let mut filled_e1rm = 0usize;

  for entry in history.iter_mut() {
    if entry.iso_date == DateTime::<Utc>::default() {
      if let Some(midnight) = entry.id.and_hms_opt(0, 0, 0) {
        entry.iso_date = midnight.and_utc();
        changed = true;
      }
    }

    for exercise in entry.exercises.iter_mut().filter(|ex| !ex.is_cardio()) {
      for set in exercise.sets.iter_mut() {
        if set.e1rm <= 0.0 && set.reps > 0 {
          set.e1rm = estimate_1rm(set.weight, set.reps);
          filled_e1rm += 1;
        }
      }
    }

    changed |= entry.recompute_volumes();
  }

  if filled_e1rm > 0 {
    changed = true;
  }
  if changed {
    tracing::info!(entries = history.len(), filled_e1rm, "Repaired stored history");
  }
  changed
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{date, mock_entry, mock_strength};

  #[test]
  fn test_clean_history_is_untouched() {
    let mut history = vec![mock_entry(date(2024, 2, 1), vec![mock_strength("Squat", &[(100.0, 5)])])];
    assert!(!repair_history(&mut history));
  }

  #[test]
  fn test_fixes_volumes_and_e1rm() {
    let mut history = vec![mock_entry(date(2024, 2, 1), vec![mock_strength("Squat", &[(100.0, 10)])])];
    history[0].exercises[0].volume = 0.0;
    history[0].total_volume = 12.0;
    history[0].exercises[0].sets[0].e1rm = 0.0;

    assert!(repair_history(&mut history));
    let entry = &history[0];
    assert_approx_eq!(entry.exercises[0].volume, 1000.0, 1e-9);
    assert_approx_eq!(entry.total_volume, 1000.0, 1e-9);
    assert_approx_eq!(entry.exercises[0].sets[0].e1rm, 133.333, 1e-3);
    assert!(!repair_history(&mut history), "second pass finds nothing");
  }

  #[test]
  fn test_fills_missing_timestamp_from_id() {
    let json = r#"[{"id": "2023-11-02", "exercises": {"Squat": {"sets": [{"weight": 100, "reps": 5}]}}}]"#;
    let mut history: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();

    assert!(repair_history(&mut history));
    assert_eq!(history[0].iso_date.date_naive(), date(2023, 11, 2));
    assert_approx_eq!(history[0].total_volume, 500.0, 1e-9);
    assert!(history[0].exercises[0].sets[0].e1rm > 0.0);
  }
}
