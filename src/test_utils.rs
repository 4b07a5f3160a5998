//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database and application state setup
//! - Mock data factories
//! - Helper assertions

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::AppState;
use crate::models::{HistoryEntry, LoggedExercise, PlanDay, PlannedExercise, WorkoutPlan, WorkoutSet};
use crate::muscle::{infer_muscle_group, MuscleGroup};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Application state over a fresh in-memory database
pub async fn setup_test_state() -> AppState {
  let pool = setup_test_db().await;
  let config = AppConfig {
    db_path: ":memory:".to_string(),
    ..AppConfig::default()
  };
  AppState::from_pool(pool, config)
    .await
    .expect("Failed to load application state")
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn mock_set(weight: f64, reps: u32, rpe: Option<f64>) -> WorkoutSet {
  WorkoutSet::new(weight, reps, rpe)
}

/// Strength exercise with the given (weight, reps) sets and no RPE
pub fn mock_strength(name: &str, sets: &[(f64, u32)]) -> LoggedExercise {
  let mut exercise = LoggedExercise::strength(name, infer_muscle_group(name), false);
  for &(weight, reps) in sets {
    exercise.push_set(WorkoutSet::new(weight, reps, None));
  }
  exercise
}

pub fn mock_cardio(name: &str, distance: f64, duration: f64) -> LoggedExercise {
  LoggedExercise::cardio(name, distance, duration, "")
}

/// History entry for a date, with volumes already computed
pub fn mock_entry(id: NaiveDate, exercises: Vec<LoggedExercise>) -> HistoryEntry {
  let iso_date = Utc.from_utc_datetime(&id.and_hms_opt(12, 0, 0).expect("valid time"));
  let mut entry = HistoryEntry {
    id,
    iso_date,
    day_name: "Test Day".to_string(),
    total_volume: 0.0,
    duration: "N/A".to_string(),
    exercises,
    prs_achieved: Vec::new(),
  };
  entry.recompute_volumes();
  entry
}

/// Three training days (Mon, Wed, Fri) led by Squat, Bench and Deadlift
pub fn mock_plan() -> WorkoutPlan {
  let day = |name: &str, exercises: Vec<PlannedExercise>| PlanDay {
    name: name.to_string(),
    exercises,
  };
  WorkoutPlan {
    name: "Test Plan".to_string(),
    active: true,
    days: vec![
      day(
        "Legs",
        vec![
          PlannedExercise::new("Squat", MuscleGroup::Legs),
          PlannedExercise::new("Leg Press", MuscleGroup::Legs),
        ],
      ),
      PlanDay::rest("Rest"),
      day(
        "Push",
        vec![
          PlannedExercise::new("Bench Press", MuscleGroup::Chest),
          PlannedExercise::bodyweight("Dips", MuscleGroup::Chest),
        ],
      ),
      PlanDay::rest("Rest"),
      day("Pull", vec![PlannedExercise::new("Deadlift", MuscleGroup::Back)]),
      PlanDay::rest("Rest"),
      PlanDay::rest("Rest"),
    ],
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_test_db_runs_migrations() {
    let pool = setup_test_db().await;
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store")
      .fetch_one(&pool)
      .await
      .unwrap();
    assert_eq!(count.0, 0);
    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_entry_has_volumes() {
    let entry = mock_entry(date(2024, 1, 1), vec![mock_strength("Squat", &[(100.0, 5), (100.0, 5)])]);
    assert_approx_eq!(entry.total_volume, 1000.0, 1e-9);
    assert_eq!(entry.exercises[0].muscle_group(), MuscleGroup::Legs);
  }

  #[test]
  fn test_mock_plan_is_a_full_week() {
    let plan = mock_plan();
    assert_eq!(plan.days.len(), 7);
    assert!(plan.days[1].is_rest_day());
  }
}
