//! Personal record tracking
//!
//! Two paths keep the table honest:
//! - `check_and_record_pr` updates it incrementally as sets are logged
//! - `recalculate_record` rebuilds one exercise from history and is the only
//!   path used after anything is deleted

use crate::models::{ExerciseRecord, HistoryEntry, PersonalRecordTable, PrEvent, WeightKey};

/// Record a logged set, returning zero, one or two PR events.
///
/// Both checks use strict `>`: matching an existing record is not a new one.
pub fn check_and_record_pr(
  table: &mut PersonalRecordTable,
  exercise_name: &str,
  weight: f64,
  reps: u32,
) -> Vec<PrEvent> {
  let record = table.entry(exercise_name.to_string()).or_default();
  let mut events = Vec::new();

  if weight > record.max_weight {
    record.max_weight = weight;
    events.push(PrEvent::Weight {
      exercise: exercise_name.to_string(),
      weight,
    });
  }

  let beats_reps = record.reps_at(weight).map_or(true, |best| reps > best);
  if beats_reps {
    record.rep_prs.insert(WeightKey::from_kg(weight), reps);
    events.push(PrEvent::Reps {
      exercise: exercise_name.to_string(),
      weight,
      reps,
    });
  }

  if !events.is_empty() {
    tracing::info!(exercise = exercise_name, weight, reps, count = events.len(), "New personal record");
  }
  events
}

/// Rebuild one exercise's record from every non-cardio set in history.
///
/// Returns None when the exercise has no sets left. Order-independent and
/// idempotent.
pub fn recalculate_record(history: &[HistoryEntry], exercise_name: &str) -> Option<ExerciseRecord> {
  let mut record = ExerciseRecord::default();
  let mut found = false;

  let sets = history
    .iter()
    .flat_map(|entry| entry.exercises.iter())
    .filter(|ex| ex.name == exercise_name && !ex.is_cardio())
    .flat_map(|ex| ex.sets.iter());

  for set in sets {
    found = true;
    record.absorb(set.weight, set.reps);
  }

  found.then_some(record)
}

/// Replace (or drop) the table entry for one exercise from history
pub fn refresh_record(table: &mut PersonalRecordTable, history: &[HistoryEntry], exercise_name: &str) {
  match recalculate_record(history, exercise_name) {
    Some(record) => {
      table.insert(exercise_name.to_string(), record);
    }
    None => {
      if table.remove(exercise_name).is_some() {
        tracing::debug!(exercise = exercise_name, "Dropped record with no remaining sets");
      }
    }
  }
}

/// Rebuild the whole table from history
pub fn rebuild_all_records(history: &[HistoryEntry]) -> PersonalRecordTable {
  let mut table = PersonalRecordTable::new();
  for entry in history {
    for ex in entry.exercises.iter().filter(|ex| !ex.is_cardio()) {
      if ex.sets.is_empty() {
        continue;
      }
      let record = table.entry(ex.name.clone()).or_default();
      for set in &ex.sets {
        record.absorb(set.weight, set.reps);
      }
    }
  }
  tracing::info!(exercises = table.len(), "Rebuilt personal record table");
  table
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::LoggedExercise;
  use crate::test_utils::{date, mock_cardio, mock_entry, mock_strength};

  fn bench_table() -> PersonalRecordTable {
    let mut table = PersonalRecordTable::new();
    let mut record = ExerciseRecord::default();
    record.absorb(80.0, 5);
    table.insert("Bench".to_string(), record);
    table
  }

  #[test]
  fn test_more_reps_at_same_weight_is_one_rep_pr() {
    let mut table = bench_table();
    let events = check_and_record_pr(&mut table, "Bench", 80.0, 6);

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], PrEvent::Reps { reps: 6, .. }));
    assert_eq!(table["Bench"].reps_at(80.0), Some(6));
    assert_eq!(table["Bench"].max_weight, 80.0);
  }

  #[test]
  fn test_heavier_weight_fires_both_events() {
    let mut table = bench_table();
    let events = check_and_record_pr(&mut table, "Bench", 85.0, 1);

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], PrEvent::Weight { .. }));
    assert_eq!(table["Bench"].max_weight, 85.0);
  }

  #[test]
  fn test_ties_and_lower_sets_are_not_records() {
    let mut table = bench_table();
    assert!(check_and_record_pr(&mut table, "Bench", 80.0, 5).is_empty());
    assert!(check_and_record_pr(&mut table, "Bench", 80.0, 4).is_empty());
    // 75 kg was never lifted, so the first set there is a rep record
    assert_eq!(check_and_record_pr(&mut table, "Bench", 75.0, 3).len(), 1);
  }

  #[test]
  fn test_first_set_of_new_exercise() {
    let mut table = PersonalRecordTable::new();
    let events = check_and_record_pr(&mut table, "Squat", 60.0, 10);
    assert_eq!(events.len(), 2);
    assert!(table.contains_key("Squat"));
  }

  #[test]
  fn test_recalculate_scans_all_entries_and_skips_cardio() {
    let history = vec![
      mock_entry(date(2024, 3, 8), vec![mock_strength("Squat", &[(100.0, 5), (100.0, 3)])]),
      mock_entry(
        date(2024, 3, 6),
        vec![mock_strength("Squat", &[(110.0, 2), (100.0, 6)]), mock_cardio("Squat", 3.0, 20.0)],
      ),
    ];

    let record = recalculate_record(&history, "Squat").unwrap();
    assert_eq!(record.max_weight, 110.0);
    assert_eq!(record.reps_at(100.0), Some(6));
    assert_eq!(record.reps_at(110.0), Some(2));
  }

  #[test]
  fn test_recalculate_is_idempotent_and_order_free() {
    let mut history = vec![
      mock_entry(date(2024, 3, 8), vec![mock_strength("Row", &[(60.0, 12)])]),
      mock_entry(date(2024, 3, 1), vec![mock_strength("Row", &[(70.0, 8), (60.0, 10)])]),
    ];
    let first = recalculate_record(&history, "Row");
    assert_eq!(first, recalculate_record(&history, "Row"));

    history.reverse();
    assert_eq!(first, recalculate_record(&history, "Row"));
  }

  #[test]
  fn test_refresh_drops_exercise_without_sets() {
    let mut table = bench_table();
    let history = vec![mock_entry(date(2024, 3, 8), vec![LoggedExercise::cardio("Bike", 10.0, 30.0, "")])];

    refresh_record(&mut table, &history, "Bench");
    assert!(!table.contains_key("Bench"));
  }

  #[test]
  fn test_rebuild_matches_per_exercise_recalculation() {
    let history = vec![
      mock_entry(
        date(2024, 3, 8),
        vec![mock_strength("Squat", &[(100.0, 5)]), mock_strength("Bench", &[(70.0, 8)])],
      ),
      mock_entry(date(2024, 3, 5), vec![mock_strength("Squat", &[(105.0, 3)])]),
    ];

    let table = rebuild_all_records(&history);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("Squat").cloned(), recalculate_record(&history, "Squat"));
    assert_eq!(table.get("Bench").cloned(), recalculate_record(&history, "Bench"));
  }
}
