use chrono::Local;
use std::collections::BTreeMap;

use super::CommandResult;
use crate::analysis::{
  self, CardioSession, ExerciseComparison, FatiguePoint, ProgressPoint, WeeklyDistance, WeeklyVolume,
  DEFAULT_CHART_WEEKS, MUSCLE_BALANCE_DAYS,
};
use crate::db::AppState;
use crate::muscle::MuscleGroup;

/// ---------------------------------------------------------------------------
/// Chart Data
/// ---------------------------------------------------------------------------

pub async fn weekly_volume(state: &AppState, weeks: Option<usize>) -> CommandResult<Vec<WeeklyVolume>> {
  let data = state.data.lock().await;
  Ok(analysis::weekly_volume(&data.history, weeks.unwrap_or(DEFAULT_CHART_WEEKS)))
}

pub async fn fatigue_trend(state: &AppState, weeks: Option<usize>) -> CommandResult<Vec<FatiguePoint>> {
  let data = state.data.lock().await;
  Ok(analysis::fatigue_trend(&data.history, weeks.unwrap_or(DEFAULT_CHART_WEEKS)))
}

pub async fn exercise_progress(state: &AppState, exercise_name: String) -> CommandResult<Vec<ProgressPoint>> {
  let data = state.data.lock().await;
  Ok(analysis::exercise_progress(&data.history, &exercise_name))
}

pub async fn compare_exercises(state: &AppState, names: Vec<String>) -> CommandResult<ExerciseComparison> {
  let data = state.data.lock().await;
  Ok(analysis::compare_exercises(&data.history, &names)?)
}

/// Volume per muscle group over the last 30 days
pub async fn muscle_balance(state: &AppState) -> CommandResult<BTreeMap<MuscleGroup, f64>> {
  let data = state.data.lock().await;
  Ok(analysis::muscle_balance(
    &data.history,
    Local::now().date_naive(),
    MUSCLE_BALANCE_DAYS,
  ))
}

pub async fn cardio_sessions(state: &AppState) -> CommandResult<Vec<CardioSession>> {
  let data = state.data.lock().await;
  Ok(analysis::cardio_sessions(&data.history))
}

pub async fn weekly_cardio_distance(state: &AppState, weeks: Option<usize>) -> CommandResult<Vec<WeeklyDistance>> {
  let data = state.data.lock().await;
  Ok(analysis::weekly_cardio_distance(&data.history, weeks.unwrap_or(DEFAULT_CHART_WEEKS)))
}

/// Names for exercise pickers
pub async fn known_exercises(state: &AppState) -> CommandResult<Vec<String>> {
  let data = state.data.lock().await;
  Ok(analysis::known_exercises(&data.history, &data.plans))
}
