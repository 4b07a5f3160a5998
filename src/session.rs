//! The in-progress workout
//!
//! Holds what has been logged since the current day was set up, keyed by a
//! log key (one per exercise card). Saving to history is the ledger's job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{GymLogError, Result};
use crate::models::{ExerciseRecord, LoggedExercise, PersonalRecordTable, PlannedExercise, PrEvent, WorkoutSet};
use crate::muscle::MuscleGroup;
use crate::personal_records::check_and_record_pr;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// A jump above this multiple of the stored max asks for confirmation
const CONFIRM_JUMP_RATIO: f64 = 1.2;
/// First-ever weights above this ask for confirmation
const CONFIRM_NEW_EXERCISE_KG: f64 = 100.0;
const OTHER_CARDIO: &str = "other";
const OTHER_CARDIO_NAME: &str = "Cardio";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSlot {
  pub key: String,
  pub exercise: LoggedExercise,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
  pub total_volume: f64,
  pub total_sets: usize,
  pub duration: String,
  pub prs: Vec<PrEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutSession {
  pub day_name: String,
  pub started_at: Option<DateTime<Utc>>,
  slots: Vec<SessionSlot>,
  session_prs: Vec<PrEvent>,
  next_seq: u64,
}

impl WorkoutSession {
  pub fn new(day_name: &str) -> Self {
    Self {
      day_name: day_name.to_string(),
      ..Self::default()
    }
  }

  /// Clear the log and start over for another day
  pub fn reset(&mut self, day_name: &str) {
    *self = Self::new(day_name);
  }

  /// Start the duration timer unless it is already running
  pub fn start_timer(&mut self, now: DateTime<Utc>) {
    self.started_at.get_or_insert(now);
  }

  pub fn slots(&self) -> &[SessionSlot] {
    &self.slots
  }

  pub fn exercise(&self, key: &str) -> Option<&LoggedExercise> {
    self.slots.iter().find(|s| s.key == key).map(|s| &s.exercise)
  }

  pub fn session_prs(&self) -> &[PrEvent] {
    &self.session_prs
  }

  pub fn has_logged_data(&self) -> bool {
    self.slots.iter().any(|s| !s.exercise.sets.is_empty() || s.exercise.is_cardio())
  }

  fn slot_mut(&mut self, key: &str) -> Result<&mut SessionSlot> {
    self
      .slots
      .iter_mut()
      .find(|s| s.key == key)
      .ok_or_else(|| GymLogError::NotFound(format!("no exercise logged under {:?}", key)))
  }

  fn next_key(&mut self, prefix: &str) -> String {
    self.next_seq += 1;
    format!("{}-{}", prefix, self.next_seq)
  }

  /// ---------------------------------------------------------------------------
  /// Logging
  /// ---------------------------------------------------------------------------

  /// Log one set for a planned exercise, updating the PR table.
  ///
  /// Bodyweight exercises log a non-finite weight as 0.
  pub fn log_set(
    &mut self,
    prs: &mut PersonalRecordTable,
    key: &str,
    planned: &PlannedExercise,
    weight: f64,
    reps: u32,
    rpe: Option<f64>,
  ) -> Result<Vec<PrEvent>> {
    let weight = if planned.is_bodyweight && !weight.is_finite() { 0.0 } else { weight };
    validate_set(weight, reps)?;

    let events = check_and_record_pr(prs, &planned.name, weight, reps);
    self.session_prs.extend(events.iter().cloned());

    let slot = match self.slots.iter().position(|s| s.key == key) {
      Some(index) => &mut self.slots[index],
      None => {
        self.slots.push(SessionSlot {
          key: key.to_string(),
          exercise: LoggedExercise::strength(&planned.name, planned.muscle_group, planned.is_bodyweight),
        });
        let last = self.slots.len() - 1;
        &mut self.slots[last]
      }
    };
    slot.exercise.push_set(WorkoutSet::new(weight, reps, rpe));

    tracing::debug!(key, exercise = %planned.name, weight, reps, "Logged set");
    Ok(events)
  }

  /// Freestyle single-set entry outside the plan
  pub fn log_quick(
    &mut self,
    prs: &mut PersonalRecordTable,
    name: &str,
    muscle_group: MuscleGroup,
    weight: f64,
    reps: u32,
  ) -> Result<Vec<PrEvent>> {
    let name = name.trim();
    if name.is_empty() {
      return Err(GymLogError::InvalidInput("exercise name is required".to_string()));
    }
    let key = self.next_key(&format!("freestyle|{}", name));
    self.log_set(prs, &key, &PlannedExercise::new(name, muscle_group), weight, reps, None)
  }

  /// Log a cardio session. `kind` "other" is stored as "Cardio".
  pub fn log_cardio(&mut self, kind: &str, distance: f64, duration: f64, notes: &str) -> Result<&LoggedExercise> {
    if !(distance.is_finite() && distance > 0.0 && duration.is_finite() && duration > 0.0) {
      return Err(GymLogError::InvalidInput(
        "distance and duration must be positive numbers".to_string(),
      ));
    }
    let name = if kind.trim().eq_ignore_ascii_case(OTHER_CARDIO) || kind.trim().is_empty() {
      OTHER_CARDIO_NAME
    } else {
      kind.trim()
    };

    let key = self.next_key("Cardio");
    self.slots.push(SessionSlot {
      key,
      exercise: LoggedExercise::cardio(name, distance, duration, notes.trim()),
    });
    tracing::debug!(activity = name, distance, duration, "Logged cardio");
    Ok(&self.slots[self.slots.len() - 1].exercise)
  }

  /// Log the last set of `key` again
  pub fn repeat_last_set(&mut self, prs: &mut PersonalRecordTable, key: &str) -> Result<Vec<PrEvent>> {
    let slot = self
      .slots
      .iter()
      .find(|s| s.key == key)
      .filter(|s| !s.exercise.sets.is_empty())
      .ok_or_else(|| GymLogError::NotFound(format!("no previous set to repeat for {:?}", key)))?;

    let ex = &slot.exercise;
    let planned = PlannedExercise {
      name: ex.name.clone(),
      muscle_group: ex.muscle_group(),
      is_bodyweight: ex.is_bodyweight,
    };
    let last = ex.sets[ex.sets.len() - 1].clone();
    self.log_set(prs, key, &planned, last.weight, last.reps, last.rpe)
  }

  /// Remove a set; an exercise left without sets leaves the log.
  /// Returns the exercise name so its record can be rebuilt.
  pub fn remove_set(&mut self, key: &str, index: usize) -> Result<String> {
    let slot = self.slot_mut(key)?;
    if slot.exercise.remove_set(index).is_none() {
      return Err(GymLogError::NotFound(format!("set {} of {:?}", index, key)));
    }
    let name = slot.exercise.name.clone();
    if slot.exercise.sets.is_empty() {
      self.slots.retain(|s| s.key != key);
    }
    Ok(name)
  }

  pub fn set_notes(&mut self, key: &str, notes: &str) -> Result<()> {
    self.slot_mut(key)?.exercise.notes = notes.to_string();
    Ok(())
  }

  /// ---------------------------------------------------------------------------
  /// Summary
  /// ---------------------------------------------------------------------------

  pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
    self
      .started_at
      .map(|start| (now - start).num_seconds().max(0))
      .unwrap_or(0)
  }

  /// Elapsed time as `HH:MM:SS`, zero when the timer never started
  pub fn format_elapsed(&self, now: DateTime<Utc>) -> String {
    format_hms(self.elapsed_seconds(now))
  }

  pub fn total_sets(&self) -> usize {
    self.slots.iter().map(|s| s.exercise.sets.len()).sum()
  }

  pub fn total_volume(&self) -> f64 {
    self
      .slots
      .iter()
      .filter(|s| !s.exercise.is_cardio())
      .map(|s| s.exercise.volume)
      .sum()
  }

  pub fn summary(&self, now: DateTime<Utc>) -> SessionSummary {
    SessionSummary {
      total_volume: self.total_volume(),
      total_sets: self.total_sets(),
      duration: self.format_elapsed(now),
      prs: self.session_prs.clone(),
    }
  }
}

fn validate_set(weight: f64, reps: u32) -> Result<()> {
  if reps == 0 {
    return Err(GymLogError::InvalidInput("reps must be a positive whole number".to_string()));
  }
  if !weight.is_finite() || weight < 0.0 {
    return Err(GymLogError::InvalidInput("weight must be zero or more".to_string()));
  }
  Ok(())
}

pub fn format_hms(total_seconds: i64) -> String {
  let secs = total_seconds.max(0);
  format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Whether a weight looks like a typo worth confirming before logging
pub fn needs_weight_confirmation(record: Option<&ExerciseRecord>, weight: f64) -> bool {
  match record {
    Some(r) if r.max_weight > 0.0 => weight > r.max_weight * CONFIRM_JUMP_RATIO,
    _ => weight > CONFIRM_NEW_EXERCISE_KG,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use chrono::Duration;

  fn squat() -> PlannedExercise {
    PlannedExercise::new("Squat", MuscleGroup::Legs)
  }

  #[test]
  fn test_log_set_creates_slot_and_tracks_prs() {
    let mut session = WorkoutSession::new("Legs");
    let mut prs = PersonalRecordTable::new();

    let events = session.log_set(&mut prs, "day|0", &squat(), 100.0, 5, Some(8.0)).unwrap();
    assert_eq!(events.len(), 2);
    session.log_set(&mut prs, "day|0", &squat(), 100.0, 5, None).unwrap();

    let ex = session.exercise("day|0").unwrap();
    assert_eq!(ex.sets.len(), 2);
    assert_approx_eq!(ex.volume, 1000.0, 1e-9);
    assert_eq!(session.session_prs().len(), 2);
    assert_eq!(prs["Squat"].max_weight, 100.0);
  }

  #[test]
  fn test_invalid_sets_rejected() {
    let mut session = WorkoutSession::default();
    let mut prs = PersonalRecordTable::new();
    assert!(matches!(
      session.log_set(&mut prs, "k", &squat(), 100.0, 0, None),
      Err(GymLogError::InvalidInput(_))
    ));
    assert!(session.log_set(&mut prs, "k", &squat(), -5.0, 5, None).is_err());
    assert!(session.log_set(&mut prs, "k", &squat(), f64::NAN, 5, None).is_err());
    assert!(session.slots().is_empty());
    assert!(prs.is_empty());
  }

  #[test]
  fn test_bodyweight_accepts_missing_weight() {
    let mut session = WorkoutSession::default();
    let mut prs = PersonalRecordTable::new();
    let dips = PlannedExercise::bodyweight("Dips", MuscleGroup::Chest);

    session.log_set(&mut prs, "k", &dips, f64::NAN, 12, None).unwrap();
    let ex = session.exercise("k").unwrap();
    assert_eq!(ex.sets[0].weight, 0.0);
    assert!(ex.is_bodyweight);
  }

  #[test]
  fn test_quick_log_uses_fresh_keys() {
    let mut session = WorkoutSession::default();
    let mut prs = PersonalRecordTable::new();
    session.log_quick(&mut prs, "Farmer Carry", MuscleGroup::Other, 40.0, 20).unwrap();
    session.log_quick(&mut prs, "Farmer Carry", MuscleGroup::Other, 40.0, 20).unwrap();

    assert_eq!(session.slots().len(), 2);
    assert_ne!(session.slots()[0].key, session.slots()[1].key);
    assert_eq!(session.slots()[0].exercise.sets[0].rpe, None);
    assert!(session.log_quick(&mut prs, "  ", MuscleGroup::Other, 40.0, 20).is_err());
  }

  #[test]
  fn test_cardio_validation_and_naming() {
    let mut session = WorkoutSession::default();
    assert!(session.log_cardio("Run", 0.0, 30.0, "").is_err());
    assert!(session.log_cardio("Run", 5.0, -1.0, "").is_err());

    let ex = session.log_cardio("other", 3.0, 20.0, " easy ").unwrap();
    assert_eq!(ex.name, "Cardio");
    assert_eq!(ex.notes, "easy");
    assert!(ex.is_cardio());
    assert!(session.has_logged_data());
  }

  #[test]
  fn test_repeat_last_set() {
    let mut session = WorkoutSession::default();
    let mut prs = PersonalRecordTable::new();
    assert!(matches!(
      session.repeat_last_set(&mut prs, "k"),
      Err(GymLogError::NotFound(_))
    ));

    session.log_set(&mut prs, "k", &squat(), 90.0, 8, Some(7.0)).unwrap();
    let events = session.repeat_last_set(&mut prs, "k").unwrap();
    assert!(events.is_empty(), "a repeat ties the record");

    let ex = session.exercise("k").unwrap();
    assert_eq!(ex.sets.len(), 2);
    assert_eq!(ex.sets[1], ex.sets[0]);
  }

  #[test]
  fn test_remove_last_set_drops_slot() {
    let mut session = WorkoutSession::default();
    let mut prs = PersonalRecordTable::new();
    session.log_set(&mut prs, "k", &squat(), 90.0, 8, None).unwrap();

    assert!(session.remove_set("k", 3).is_err());
    assert_eq!(session.remove_set("k", 0).unwrap(), "Squat");
    assert!(session.exercise("k").is_none());
    assert!(!session.has_logged_data());
  }

  #[test]
  fn test_timer_and_summary() {
    let start = Utc::now();
    let mut session = WorkoutSession::new("Legs");
    let mut prs = PersonalRecordTable::new();
    assert_eq!(session.format_elapsed(start), "00:00:00");

    session.start_timer(start);
    session.start_timer(start + Duration::minutes(5));
    assert_eq!(session.started_at, Some(start));

    session.log_set(&mut prs, "k", &squat(), 100.0, 5, None).unwrap();
    session.log_cardio("Run", 5.0, 30.0, "").unwrap();

    let summary = session.summary(start + Duration::seconds(3723));
    assert_eq!(summary.duration, "01:02:03");
    assert_eq!(summary.total_sets, 1);
    assert_approx_eq!(summary.total_volume, 500.0, 1e-9);
    assert_eq!(summary.prs.len(), 2);

    session.reset("Push");
    assert!(session.slots().is_empty());
    assert!(session.session_prs().is_empty());
    assert_eq!(session.started_at, None);
  }

  #[test]
  fn test_weight_confirmation() {
    let mut record = ExerciseRecord::default();
    assert!(needs_weight_confirmation(None, 120.0));
    assert!(!needs_weight_confirmation(None, 100.0));
    assert!(needs_weight_confirmation(Some(&record), 101.0));

    record.absorb(100.0, 5);
    assert!(!needs_weight_confirmation(Some(&record), 120.0));
    assert!(needs_weight_confirmation(Some(&record), 120.5));
  }
}
