//! Deterministic analysis layer for training charts
//!
//! Aggregates history into the series the charts plot. Rendering lives in
//! the UI shell; everything here is pure and works on newest-first history.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GymLogError, Result};
use crate::models::{HistoryEntry, WorkoutPlan};
use crate::muscle::MuscleGroup;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_CHART_WEEKS: usize = 12;
pub const MUSCLE_BALANCE_DAYS: i64 = 30;
const MIN_COMPARED: usize = 2;
const MAX_COMPARED: usize = 5;

/// ISO week label, e.g. `2024-W07`
pub fn iso_week_label(date: NaiveDate) -> String {
  let week = date.iso_week();
  format!("{}-W{:02}", week.year(), week.week())
}

/// Keep the last `weeks` labels of a week-keyed map, oldest first
fn last_weeks<T>(by_week: BTreeMap<String, T>, weeks: usize) -> Vec<(String, T)> {
  let skip = by_week.len().saturating_sub(weeks);
  by_week.into_iter().skip(skip).collect()
}

/// ---------------------------------------------------------------------------
/// Volume and Fatigue
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyVolume {
  pub week: String,
  pub volume: f64,
}

/// Total volume per ISO week, for the most recent `weeks` weeks with data
pub fn weekly_volume(history: &[HistoryEntry], weeks: usize) -> Vec<WeeklyVolume> {
  let mut by_week: BTreeMap<String, f64> = BTreeMap::new();
  for entry in history {
    *by_week.entry(iso_week_label(entry.id)).or_default() += entry.total_volume;
  }
  last_weeks(by_week, weeks)
    .into_iter()
    .map(|(week, volume)| WeeklyVolume { week, volume })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatiguePoint {
  pub week: String,
  pub volume: f64,
  /// Mean over the week's sessions of each session's best e1RM
  pub avg_max_e1rm: f64,
}

/// Volume against strength: rising volume with flat e1RM hints at fatigue
pub fn fatigue_trend(history: &[HistoryEntry], weeks: usize) -> Vec<FatiguePoint> {
  #[derive(Default)]
  struct Acc {
    volume: f64,
    e1rm_total: f64,
    sessions: usize,
  }

  let mut by_week: BTreeMap<String, Acc> = BTreeMap::new();
  for entry in history {
    let acc = by_week.entry(iso_week_label(entry.id)).or_default();
    acc.volume += entry.total_volume;

    let best = entry
      .exercises
      .iter()
      .filter(|ex| !ex.is_cardio())
      .map(|ex| ex.max_e1rm())
      .fold(0.0, f64::max);
    if best > 0.0 {
      acc.e1rm_total += best;
      acc.sessions += 1;
    }
  }

  last_weeks(by_week, weeks)
    .into_iter()
    .map(|(week, acc)| FatiguePoint {
      week,
      volume: acc.volume,
      avg_max_e1rm: if acc.sessions > 0 {
        acc.e1rm_total / acc.sessions as f64
      } else {
        0.0
      },
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Per-Exercise Progress
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
  pub date: NaiveDate,
  pub volume: f64,
  pub max_e1rm: f64,
}

/// One point per session that trained the exercise, oldest first
pub fn exercise_progress(history: &[HistoryEntry], exercise_name: &str) -> Vec<ProgressPoint> {
  history
    .iter()
    .rev()
    .filter_map(|entry| {
      let ex = entry.exercise(exercise_name).filter(|ex| !ex.is_cardio())?;
      Some(ProgressPoint {
        date: entry.id,
        volume: ex.volume,
        max_e1rm: ex.max_e1rm(),
      })
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
  pub exercise: String,
  /// Aligned with `ExerciseComparison::dates`; None where not trained
  pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseComparison {
  pub dates: Vec<NaiveDate>,
  pub series: Vec<ComparisonSeries>,
}

/// Best e1RM per session for two to five exercises on a shared date axis
pub fn compare_exercises(history: &[HistoryEntry], names: &[String]) -> Result<ExerciseComparison> {
  if !(MIN_COMPARED..=MAX_COMPARED).contains(&names.len()) {
    return Err(GymLogError::InvalidInput(format!(
      "pick between {} and {} exercises to compare",
      MIN_COMPARED, MAX_COMPARED
    )));
  }

  let dates: Vec<NaiveDate> = history
    .iter()
    .map(|e| e.id)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();

  let series = names
    .iter()
    .map(|name| {
      let by_date: BTreeMap<NaiveDate, f64> = history
        .iter()
        .filter_map(|entry| {
          let best = entry.exercise(name).filter(|ex| !ex.is_cardio())?.max_e1rm();
          (best > 0.0).then_some((entry.id, best))
        })
        .collect();
      ComparisonSeries {
        exercise: name.clone(),
        values: dates.iter().map(|d| by_date.get(d).copied()).collect(),
      }
    })
    .collect();

  Ok(ExerciseComparison { dates, series })
}

/// ---------------------------------------------------------------------------
/// Muscle Balance
/// ---------------------------------------------------------------------------

/// Strength volume per muscle group over entries newer than `days` ago.
/// Every group is present, zero when untrained.
pub fn muscle_balance(history: &[HistoryEntry], today: NaiveDate, days: i64) -> BTreeMap<MuscleGroup, f64> {
  let cutoff = today - Duration::days(days);
  let mut balance: BTreeMap<MuscleGroup, f64> = MuscleGroup::ALL.iter().map(|g| (*g, 0.0)).collect();

  for entry in history.iter().filter(|e| e.id > cutoff) {
    for ex in entry.exercises.iter().filter(|ex| !ex.is_cardio()) {
      *balance.entry(ex.muscle_group()).or_default() += ex.volume;
    }
  }
  balance
}

/// ---------------------------------------------------------------------------
/// Cardio
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardioSession {
  pub date: NaiveDate,
  pub name: String,
  /// km
  pub distance: f64,
  /// minutes
  pub duration: f64,
  /// min/km, None for zero distance
  pub pace: Option<f64>,
}

pub fn cardio_sessions(history: &[HistoryEntry]) -> Vec<CardioSession> {
  let mut sessions: Vec<CardioSession> = history
    .iter()
    .flat_map(|entry| {
      entry.exercises.iter().filter(|ex| ex.is_cardio()).map(move |ex| {
        let distance = ex.distance.unwrap_or(0.0);
        let duration = ex.duration.unwrap_or(0.0);
        CardioSession {
          date: entry.id,
          name: ex.name.clone(),
          distance,
          duration,
          pace: (distance > 0.0).then(|| duration / distance),
        }
      })
    })
    .collect();
  sessions.sort_by_key(|s| s.date);
  sessions
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDistance {
  pub week: String,
  pub distance: f64,
}

pub fn weekly_cardio_distance(history: &[HistoryEntry], weeks: usize) -> Vec<WeeklyDistance> {
  let mut by_week: BTreeMap<String, f64> = BTreeMap::new();
  for session in cardio_sessions(history) {
    *by_week.entry(iso_week_label(session.date)).or_default() += session.distance;
  }
  last_weeks(by_week, weeks)
    .into_iter()
    .map(|(week, distance)| WeeklyDistance { week, distance })
    .collect()
}

/// Every exercise name seen in history or any plan, sorted and de-duplicated
pub fn known_exercises(history: &[HistoryEntry], plans: &[WorkoutPlan]) -> Vec<String> {
  let from_history = history.iter().flat_map(|e| e.exercises.iter().map(|ex| ex.name.as_str()));
  let from_plans = plans
    .iter()
    .flat_map(|p| p.days.iter())
    .flat_map(|d| d.exercises.iter().map(|ex| ex.name.as_str()));

  from_history
    .chain(from_plans)
    .filter(|name| !name.is_empty())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
