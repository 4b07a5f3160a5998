//! History ledger: saving sessions and deleting from history
//!
//! Every deletion removes the item, then runs `compact` to restore the
//! invariants (volumes match sets, no empty exercises, no empty entries), then
//! rebuilds the records of every exercise it touched.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::error::{GymLogError, Result};
use crate::models::{HistoryEntry, PersonalRecordTable};
use crate::personal_records::refresh_record;
use crate::session::WorkoutSession;

const NO_DURATION: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
  /// Today's entry was written
  Saved,
  /// Nothing logged, so today's entry was removed
  Cleared,
  /// Nothing logged and no entry existed
  Unchanged,
}

/// Write the session as today's entry, replacing any earlier save today.
pub fn save_session(
  history: &mut Vec<HistoryEntry>,
  session: &WorkoutSession,
  now: DateTime<Local>,
  track_duration: bool,
) -> SaveOutcome {
  let today = now.date_naive();
  let existing = history.iter().position(|e| e.id == today);

  let exercises: Vec<_> = session
    .slots()
    .iter()
    .map(|slot| &slot.exercise)
    .filter(|ex| !ex.sets.is_empty() || ex.is_cardio())
    .cloned()
    .collect();

  if exercises.is_empty() {
    return match existing {
      Some(index) => {
        history.remove(index);
        tracing::info!(date = %today, "Removed empty workout entry");
        SaveOutcome::Cleared
      }
      None => SaveOutcome::Unchanged,
    };
  }

  let now_utc = now.with_timezone(&Utc);
  let mut entry = HistoryEntry {
    id: today,
    iso_date: now_utc,
    day_name: session.day_name.clone(),
    total_volume: 0.0,
    duration: if track_duration {
      session.format_elapsed(now_utc)
    } else {
      NO_DURATION.to_string()
    },
    exercises,
    prs_achieved: session.session_prs().to_vec(),
  };
  entry.recompute_volumes();

  tracing::info!(
    date = %today,
    exercises = entry.exercises.len(),
    total_volume = entry.total_volume,
    "Saved workout"
  );

  match existing {
    Some(index) => history[index] = entry,
    None => history.insert(0, entry),
  }
  SaveOutcome::Saved
}

/// Restore ledger invariants after a deletion.
///
/// Recomputes every volume, drops strength exercises with no sets and drops
/// entries with no exercises. Returns the number of entries removed.
pub fn compact(history: &mut Vec<HistoryEntry>) -> usize {
  for entry in history.iter_mut() {
    entry
      .exercises
      .retain(|ex| ex.is_cardio() || !ex.sets.is_empty());
    entry.recompute_volumes();
  }
  let before = history.len();
  history.retain(|entry| !entry.exercises.is_empty());
  before - history.len()
}

fn entry_mut(history: &mut [HistoryEntry], entry_index: usize) -> Result<&mut HistoryEntry> {
  history
    .get_mut(entry_index)
    .ok_or_else(|| GymLogError::NotFound(format!("history entry {}", entry_index)))
}

/// Delete a whole day and rebuild the records of its strength exercises
pub fn delete_entry(
  history: &mut Vec<HistoryEntry>,
  prs: &mut PersonalRecordTable,
  entry_index: usize,
) -> Result<HistoryEntry> {
  if entry_index >= history.len() {
    return Err(GymLogError::NotFound(format!("history entry {}", entry_index)));
  }
  let removed = history.remove(entry_index);

  for ex in removed.exercises.iter().filter(|ex| !ex.is_cardio()) {
    refresh_record(prs, history, &ex.name);
  }
  tracing::info!(date = %removed.id, "Deleted workout entry");
  Ok(removed)
}

/// Delete one exercise from an entry; the entry goes too if it empties
pub fn delete_exercise(
  history: &mut Vec<HistoryEntry>,
  prs: &mut PersonalRecordTable,
  entry_index: usize,
  exercise_index: usize,
) -> Result<()> {
  let entry = entry_mut(history, entry_index)?;
  if exercise_index >= entry.exercises.len() {
    return Err(GymLogError::NotFound(format!(
      "exercise {} of history entry {}",
      exercise_index, entry_index
    )));
  }
  let removed = entry.exercises.remove(exercise_index);

  compact(history);
  if !removed.is_cardio() {
    refresh_record(prs, history, &removed.name);
  }
  tracing::info!(exercise = %removed.name, "Deleted exercise from history");
  Ok(())
}

/// Delete one set; empties cascade to the exercise and then the entry
pub fn delete_set(
  history: &mut Vec<HistoryEntry>,
  prs: &mut PersonalRecordTable,
  entry_index: usize,
  exercise_index: usize,
  set_index: usize,
) -> Result<()> {
  let entry = entry_mut(history, entry_index)?;
  let exercise = entry.exercises.get_mut(exercise_index).ok_or_else(|| {
    GymLogError::NotFound(format!("exercise {} of history entry {}", exercise_index, entry_index))
  })?;
  if exercise.remove_set(set_index).is_none() {
    return Err(GymLogError::NotFound(format!(
      "set {} of exercise {}",
      set_index, exercise_index
    )));
  }
  let name = exercise.name.clone();
  let is_cardio = exercise.is_cardio();

  compact(history);
  if !is_cardio {
    refresh_record(prs, history, &name);
  }
  Ok(())
}
