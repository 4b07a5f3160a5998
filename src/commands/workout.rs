use chrono::{Local, Utc};
use serde::Serialize;

use super::CommandResult;
use crate::coach::{generate_suggestions, CoachSignal};
use crate::db::AppState;
use crate::error::{GymLogError, Result};
use crate::ledger::{save_session, SaveOutcome};
use crate::models::{LoggedExercise, PlannedExercise, PrEvent};
use crate::muscle::{infer_muscle_group, MuscleGroup};
use crate::personal_records::refresh_record;
use crate::progression::{suggest_for_session, ProgressionRule, WeightSuggestion};
use crate::session::{needs_weight_confirmation, SessionSummary, WorkoutSession};
use crate::state::GymData;

/// A planned exercise as shown on the day screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayExercise {
  /// Log key to pass back to `log_set`
  pub key: String,
  pub exercise: PlannedExercise,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
  pub day_index: usize,
  pub day_name: String,
  pub exercises: Vec<DayExercise>,
}

/// Write the session as today's entry and persist history and records
async fn autosave(state: &AppState, data: &mut GymData, session: &WorkoutSession) -> Result<SaveOutcome> {
  let outcome = save_session(
    &mut data.history,
    session,
    Local::now(),
    data.settings.use_total_duration_timer,
  );
  if outcome != SaveOutcome::Unchanged {
    data.persist_history(&state.store).await?;
  }
  data.persist_personal_records(&state.store).await?;
  Ok(outcome)
}

/// The duration timer runs from the first set logged, when enabled
fn start_timer_if_enabled(data: &GymData, session: &mut WorkoutSession) {
  if data.settings.use_total_duration_timer {
    session.start_timer(Utc::now());
  }
}

/// ---------------------------------------------------------------------------
/// Session Lifecycle
/// ---------------------------------------------------------------------------

// Mutating commands work on copies of the data and session and only swap them
// in once storage has accepted the write.

/// Set up a day of the active plan and clear the session log
pub async fn start_day(state: &AppState, day_index: usize) -> CommandResult<DayView> {
  let data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let plan = data
    .active_plan()
    .ok_or_else(|| GymLogError::NotFound("active plan".to_string()))?;
  let day = plan
    .day(day_index)
    .ok_or_else(|| GymLogError::NotFound(format!("day {} of {}", day_index, plan.name)))?;

  session.reset(&day.name);
  tracing::info!(day = %day.name, exercises = day.exercises.len(), "Started workout day");

  Ok(DayView {
    day_index,
    day_name: day.name.clone(),
    exercises: day
      .exercises
      .iter()
      .enumerate()
      .map(|(i, exercise)| DayExercise {
        key: format!("{}-{}", day_index, i),
        exercise: exercise.clone(),
      })
      .collect(),
  })
}

pub async fn log_set(
  state: &AppState,
  key: String,
  exercise: PlannedExercise,
  weight: f64,
  reps: u32,
  rpe: Option<f64>,
) -> CommandResult<Vec<PrEvent>> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  let mut next_session = session.clone();
  let events = next_session.log_set(&mut next.personal_records, &key, &exercise, weight, reps, rpe)?;
  start_timer_if_enabled(&next, &mut next_session);
  autosave(state, &mut next, &next_session).await?;

  *data = next;
  *session = next_session;
  Ok(events)
}

/// Freestyle set outside the plan; the muscle group is inferred when absent
pub async fn log_quick(
  state: &AppState,
  name: String,
  muscle_group: Option<MuscleGroup>,
  weight: f64,
  reps: u32,
) -> CommandResult<Vec<PrEvent>> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let group = muscle_group.unwrap_or_else(|| infer_muscle_group(&name));
  let mut next = data.clone();
  let mut next_session = session.clone();
  let events = next_session.log_quick(&mut next.personal_records, &name, group, weight, reps)?;
  start_timer_if_enabled(&next, &mut next_session);
  autosave(state, &mut next, &next_session).await?;

  *data = next;
  *session = next_session;
  Ok(events)
}

pub async fn log_cardio(
  state: &AppState,
  kind: String,
  distance: f64,
  duration: f64,
  notes: String,
) -> CommandResult<LoggedExercise> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  let mut next_session = session.clone();
  let logged = next_session.log_cardio(&kind, distance, duration, &notes)?.clone();
  autosave(state, &mut next, &next_session).await?;

  *data = next;
  *session = next_session;
  Ok(logged)
}

pub async fn repeat_last_set(state: &AppState, key: String) -> CommandResult<Vec<PrEvent>> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  let mut next_session = session.clone();
  let events = next_session.repeat_last_set(&mut next.personal_records, &key)?;
  start_timer_if_enabled(&next, &mut next_session);
  autosave(state, &mut next, &next_session).await?;

  *data = next;
  *session = next_session;
  Ok(events)
}

/// Undo a set logged this session and rebuild that exercise's record
pub async fn remove_session_set(state: &AppState, key: String, set_index: usize) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  let mut next_session = session.clone();
  let name = next_session.remove_set(&key, set_index)?;
  save_session(
    &mut next.history,
    &next_session,
    Local::now(),
    next.settings.use_total_duration_timer,
  );
  refresh_record(&mut next.personal_records, &next.history, &name);
  next.persist_history(&state.store).await?;
  next.persist_personal_records(&state.store).await?;

  *data = next;
  *session = next_session;
  Ok(())
}

pub async fn set_notes(state: &AppState, key: String, notes: String) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  let mut next_session = session.clone();
  next_session.set_notes(&key, &notes)?;
  autosave(state, &mut next, &next_session).await?;

  *data = next;
  *session = next_session;
  Ok(())
}

/// Running totals for the session in progress
pub async fn session_summary(state: &AppState) -> CommandResult<SessionSummary> {
  Ok(state.session.lock().await.summary(Utc::now()))
}

/// Save the session one last time, return its summary and clear the log
pub async fn finish_workout(state: &AppState) -> CommandResult<SessionSummary> {
  let mut data = state.data.lock().await;
  let mut session = state.session.lock().await;

  let mut next = data.clone();
  autosave(state, &mut next, &session).await?;
  *data = next;

  let summary = session.summary(Utc::now());
  tracing::info!(
    sets = summary.total_sets,
    volume = summary.total_volume,
    prs = summary.prs.len(),
    "Finished workout"
  );
  let day_name = session.day_name.clone();
  session.reset(&day_name);
  Ok(summary)
}

/// ---------------------------------------------------------------------------
/// Advice
/// ---------------------------------------------------------------------------

/// Next working weight; a queued coach suggestion is used once and cleared
pub async fn suggest_weight(state: &AppState, exercise_name: String) -> CommandResult<Option<WeightSuggestion>> {
  let mut data = state.data.lock().await;

  let mut pending = data.pending_suggestions.clone();
  let suggestion = suggest_for_session(&data.history, &mut pending, &exercise_name);
  if matches!(&suggestion, Some(s) if s.rule == ProgressionRule::CoachOverride) {
    let mut next = data.clone();
    next.pending_suggestions = pending;
    next.persist_suggestions(&state.store).await?;
    *data = next;
  }
  Ok(suggestion)
}

pub async fn queue_suggestion(state: &AppState, exercise_name: String, weight: f64) -> CommandResult<()> {
  if exercise_name.trim().is_empty() {
    return Err(GymLogError::InvalidInput("exercise name is required".to_string()).into());
  }
  if !weight.is_finite() || weight <= 0.0 {
    return Err(GymLogError::InvalidInput("suggested weight must be positive".to_string()).into());
  }

  let mut data = state.data.lock().await;
  let mut next = data.clone();
  next.pending_suggestions.queue(exercise_name.trim(), weight);
  next.persist_suggestions(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn coach_suggestions(state: &AppState) -> CommandResult<Vec<CoachSignal>> {
  let data = state.data.lock().await;
  Ok(generate_suggestions(
    &data.history,
    data.active_plan(),
    Local::now().date_naive(),
  ))
}

/// Whether `weight` is unusual enough to confirm before logging
pub async fn check_weight(state: &AppState, exercise_name: String, weight: f64) -> CommandResult<bool> {
  let data = state.data.lock().await;
  Ok(needs_weight_confirmation(
    data.personal_records.get(&exercise_name),
    weight,
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{HistoryEntry, PersonalRecordTable};
  use crate::storage::keys;
  use crate::test_utils::{mock_plan, setup_test_state};

  async fn state_with_test_plan() -> AppState {
    let state = setup_test_state().await;
    {
      let mut data = state.data.lock().await;
      data.plans = vec![mock_plan()];
      data.persist_plans(&state.store).await.unwrap();
    }
    state
  }

  fn squat() -> PlannedExercise {
    PlannedExercise::new("Squat", MuscleGroup::Legs)
  }

  #[tokio::test]
  async fn test_start_day_lists_keys() {
    let state = state_with_test_plan().await;
    let day = start_day(&state, 0).await.unwrap();
    assert_eq!(day.day_name, "Legs");
    assert_eq!(day.exercises[1].key, "0-1");
    assert_eq!(day.exercises[1].exercise.name, "Leg Press");
    assert!(start_day(&state, 9).await.is_err());
  }

  #[tokio::test]
  async fn test_timer_starts_with_first_set() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();
    assert_eq!(state.session.lock().await.started_at, None);

    log_set(&state, "0-0".into(), squat(), 100.0, 5, None).await.unwrap();
    let started = state.session.lock().await.started_at;
    assert!(started.is_some());

    repeat_last_set(&state, "0-0".into()).await.unwrap();
    assert_eq!(state.session.lock().await.started_at, started);
  }

  #[tokio::test]
  async fn test_timer_stays_off_when_disabled() {
    let state = state_with_test_plan().await;
    state.data.lock().await.settings.use_total_duration_timer = false;
    start_day(&state, 1).await.unwrap();

    log_quick(&state, "Barbell Curl".into(), None, 30.0, 10).await.unwrap();
    assert_eq!(state.session.lock().await.started_at, None);
  }

  #[tokio::test]
  async fn test_failed_write_leaves_state_untouched() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();
    log_set(&state, "0-0".into(), squat(), 100.0, 5, None).await.unwrap();

    let before = state.data.lock().await.clone();
    state.store.pool().close().await;

    assert!(log_set(&state, "0-0".into(), squat(), 120.0, 5, None).await.is_err());
    assert!(log_cardio(&state, "Run".into(), 5.0, 30.0, String::new()).await.is_err());
    assert!(remove_session_set(&state, "0-0".into(), 0).await.is_err());
    assert!(queue_suggestion(&state, "Squat".into(), 90.0).await.is_err());

    assert_eq!(*state.data.lock().await, before);
    assert_eq!(before.personal_records["Squat"].max_weight, 100.0);
    let session = state.session.lock().await;
    assert_eq!(session.total_sets(), 1);
    assert_eq!(session.summary(Utc::now()).prs.len(), 2);
  }

  #[tokio::test]
  async fn test_log_set_autosaves_today() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();

    let events = log_set(&state, "0-0".into(), squat(), 100.0, 5, Some(8.0)).await.unwrap();
    assert_eq!(events.len(), 2, "first set of an exercise is a weight and a rep PR");
    log_set(&state, "0-0".into(), squat(), 100.0, 5, None).await.unwrap();

    let history = state.data.lock().await.history.clone();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, Local::now().date_naive());
    assert_eq!(history[0].day_name, "Legs");
    assert_eq!(history[0].total_volume, 1000.0);

    let stored: Vec<HistoryEntry> = state.store.load(keys::HISTORY, Vec::new()).await;
    assert_eq!(stored, history);
    let stored_prs: PersonalRecordTable = state.store.load(keys::PERSONAL_RECORDS, PersonalRecordTable::new()).await;
    assert_eq!(stored_prs["Squat"].max_weight, 100.0);
  }

  #[tokio::test]
  async fn test_invalid_set_changes_nothing() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();

    let err = log_set(&state, "0-0".into(), squat(), 100.0, 0, None).await.unwrap_err();
    assert!(err.message.contains("reps"));
    assert!(state.data.lock().await.history.is_empty());
  }

  #[tokio::test]
  async fn test_removing_last_set_clears_entry_and_record() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();
    log_set(&state, "0-0".into(), squat(), 100.0, 5, None).await.unwrap();

    remove_session_set(&state, "0-0".into(), 0).await.unwrap();
    let data = state.data.lock().await;
    assert!(data.history.is_empty());
    assert!(!data.personal_records.contains_key("Squat"));
  }

  #[tokio::test]
  async fn test_repeat_and_finish() {
    let state = state_with_test_plan().await;
    start_day(&state, 0).await.unwrap();
    log_set(&state, "0-0".into(), squat(), 100.0, 5, None).await.unwrap();
    repeat_last_set(&state, "0-0".into()).await.unwrap();
    log_cardio(&state, "other".into(), 3.0, 20.0, String::new()).await.unwrap();

    let summary = finish_workout(&state).await.unwrap();
    assert_eq!(summary.total_sets, 2);
    assert_eq!(summary.total_volume, 1000.0);
    assert_eq!(state.session.lock().await.total_sets(), 0);

    let data = state.data.lock().await;
    assert_eq!(data.history[0].exercises.len(), 2);
    assert_eq!(data.history[0].exercises[1].name, "Cardio");
  }

  #[tokio::test]
  async fn test_queued_suggestion_is_used_once() {
    let state = state_with_test_plan().await;
    queue_suggestion(&state, "Squat".into(), 90.0).await.unwrap();

    let first = suggest_weight(&state, "Squat".into()).await.unwrap().unwrap();
    assert_eq!(first.suggested_weight, 90.0);
    assert_eq!(first.rule, ProgressionRule::CoachOverride);
    assert_eq!(suggest_weight(&state, "Squat".into()).await.unwrap(), None);

    let stored: crate::progression::PendingSuggestions =
      state.store.load(keys::SUGGESTIONS, Default::default()).await;
    assert!(stored.is_empty());
    assert!(queue_suggestion(&state, "Squat".into(), -5.0).await.is_err());
  }

  #[tokio::test]
  async fn test_check_weight_and_coach_on_empty_history() {
    let state = state_with_test_plan().await;
    assert!(check_weight(&state, "Squat".into(), 140.0).await.unwrap());
    assert!(!check_weight(&state, "Squat".into(), 60.0).await.unwrap());
    assert!(coach_suggestions(&state).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_quick_log_infers_group() {
    let state = state_with_test_plan().await;
    start_day(&state, 1).await.unwrap();
    log_quick(&state, "Barbell Curl".into(), None, 30.0, 10).await.unwrap();

    let data = state.data.lock().await;
    assert_eq!(data.history[0].exercises[0].muscle_group, Some(MuscleGroup::Arms));
  }
}
