use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::estimator::estimate_1rm;
use crate::muscle::{infer_muscle_group, MuscleGroup};

/// One completed set. `e1rm` is derived from weight and reps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
  pub weight: f64,
  pub reps: u32,
  /// Rate of perceived exertion, absent when not recorded
  #[serde(default, deserialize_with = "deserialize_rpe")]
  pub rpe: Option<f64>,
  #[serde(default)]
  pub e1rm: f64,
}

impl WorkoutSet {
  pub fn new(weight: f64, reps: u32, rpe: Option<f64>) -> Self {
    Self {
      weight,
      reps,
      rpe,
      e1rm: estimate_1rm(weight, reps),
    }
  }

  pub fn volume(&self) -> f64 {
    self.weight * self.reps as f64
  }
}

/// Older data stores RPE as a string, with "-" meaning "not recorded"
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRpe {
  Number(f64),
  Text(String),
}

fn deserialize_rpe<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
  let raw: Option<RawRpe> = Option::deserialize(deserializer)?;
  Ok(match raw {
    Some(RawRpe::Number(n)) if n.is_finite() => Some(n),
    Some(RawRpe::Text(text)) => parse_rpe(&text),
    _ => None,
  })
}

/// Parse a user-entered RPE; blank or "-" means not recorded
pub fn parse_rpe(text: &str) -> Option<f64> {
  text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The earliest saves keyed exercises by name instead of listing them
#[derive(Deserialize)]
#[serde(untagged)]
enum RawExercises {
  List(Vec<LoggedExercise>),
  Keyed(serde_json::Map<String, serde_json::Value>),
}

fn deserialize_exercises<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LoggedExercise>, D::Error> {
  match Option::<RawExercises>::deserialize(deserializer)? {
    None => Ok(Vec::new()),
    Some(RawExercises::List(list)) => Ok(list),
    Some(RawExercises::Keyed(map)) => map
      .into_iter()
      .map(|(name, mut value)| {
        if let Some(fields) = value.as_object_mut() {
          fields.entry("name").or_insert(serde_json::Value::String(name));
        }
        serde_json::from_value(value).map_err(de::Error::custom)
      })
      .collect(),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
  #[default]
  Strength,
  Cardio,
}

/// An exercise as logged on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub muscle_group: Option<MuscleGroup>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub sets: Vec<WorkoutSet>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub notes: String,
  /// Σ weight × reps over `sets`; maintained by `recompute_volume`
  #[serde(default)]
  pub volume: f64,
  #[serde(default)]
  pub is_bodyweight: bool,
  #[serde(rename = "type", default)]
  pub kind: ExerciseKind,
  /// Kilometres, cardio only
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
  /// Minutes, cardio only
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration: Option<f64>,
}

impl LoggedExercise {
  pub fn strength(name: &str, muscle_group: MuscleGroup, is_bodyweight: bool) -> Self {
    Self {
      name: name.to_string(),
      muscle_group: Some(muscle_group),
      sets: Vec::new(),
      notes: String::new(),
      volume: 0.0,
      is_bodyweight,
      kind: ExerciseKind::Strength,
      distance: None,
      duration: None,
    }
  }

  pub fn cardio(name: &str, distance: f64, duration: f64, notes: &str) -> Self {
    Self {
      name: name.to_string(),
      muscle_group: Some(MuscleGroup::Cardio),
      sets: Vec::new(),
      notes: notes.to_string(),
      volume: 0.0,
      is_bodyweight: false,
      kind: ExerciseKind::Cardio,
      distance: Some(distance),
      duration: Some(duration),
    }
  }

  pub fn is_cardio(&self) -> bool {
    self.kind == ExerciseKind::Cardio
  }

  /// Stored group, or one inferred from the name for older records
  pub fn muscle_group(&self) -> MuscleGroup {
    self.muscle_group.unwrap_or_else(|| infer_muscle_group(&self.name))
  }

  pub fn push_set(&mut self, set: WorkoutSet) {
    self.sets.push(set);
    self.recompute_volume();
  }

  pub fn remove_set(&mut self, index: usize) -> Option<WorkoutSet> {
    if index >= self.sets.len() {
      return None;
    }
    let removed = self.sets.remove(index);
    self.recompute_volume();
    Some(removed)
  }

  /// Returns true when the stored volume was stale
  pub fn recompute_volume(&mut self) -> bool {
    let volume = if self.is_cardio() {
      0.0
    } else {
      self.sets.iter().map(WorkoutSet::volume).sum()
    };
    let changed = self.volume != volume;
    self.volume = volume;
    changed
  }

  /// Heaviest set; on ties the earliest one wins
  pub fn top_set(&self) -> Option<&WorkoutSet> {
    let mut sets = self.sets.iter();
    let first = sets.next()?;
    Some(sets.fold(first, |best, set| if best.weight >= set.weight { best } else { set }))
  }

  pub fn max_e1rm(&self) -> f64 {
    self.sets.iter().map(|s| s.e1rm).fold(0.0, f64::max)
  }
}

/// A personal record hit during a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrEvent {
  Weight { exercise: String, weight: f64 },
  Reps { exercise: String, weight: f64, reps: u32 },
}

impl PrEvent {
  pub fn exercise(&self) -> &str {
    match self {
      PrEvent::Weight { exercise, .. } | PrEvent::Reps { exercise, .. } => exercise,
    }
  }

  pub fn weight(&self) -> f64 {
    match self {
      PrEvent::Weight { weight, .. } | PrEvent::Reps { weight, .. } => *weight,
    }
  }
}

impl std::fmt::Display for PrEvent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PrEvent::Weight { exercise, weight } => write!(f, "{}: new max weight {} kg", exercise, weight),
      PrEvent::Reps { exercise, weight, reps } => {
        write!(f, "{}: new record at {} kg, {} reps", exercise, weight, reps)
      }
    }
  }
}

/// One calendar day's workout. `id` is the local calendar date and is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  pub id: NaiveDate,
  #[serde(default)]
  pub iso_date: DateTime<Utc>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub day_name: String,
  /// Σ volume over non-cardio exercises
  #[serde(default)]
  pub total_volume: f64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub duration: String,
  #[serde(default, deserialize_with = "deserialize_exercises")]
  pub exercises: Vec<LoggedExercise>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub prs_achieved: Vec<PrEvent>,
}

impl HistoryEntry {
  pub fn contains(&self, exercise_name: &str) -> bool {
    self.exercises.iter().any(|ex| ex.name == exercise_name)
  }

  /// First exercise with this name
  pub fn exercise(&self, exercise_name: &str) -> Option<&LoggedExercise> {
    self.exercises.iter().find(|ex| ex.name == exercise_name)
  }

  /// Recompute every exercise volume and the entry total.
  /// Returns true when anything was stale.
  pub fn recompute_volumes(&mut self) -> bool {
    let mut changed = false;
    for exercise in &mut self.exercises {
      changed |= exercise.recompute_volume();
    }
    let total: f64 = self
      .exercises
      .iter()
      .filter(|ex| !ex.is_cardio())
      .map(|ex| ex.volume)
      .sum();
    changed |= self.total_volume != total;
    self.total_volume = total;
    changed
  }

  pub fn set_count(&self) -> usize {
    self.exercises.iter().map(|ex| ex.sets.len()).sum()
  }
}
