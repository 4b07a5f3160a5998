use serde::{Deserialize, Serialize};

use crate::muscle::MuscleGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
  pub name: String,
  #[serde(default)]
  pub muscle_group: MuscleGroup,
  #[serde(default)]
  pub is_bodyweight: bool,
}

impl PlannedExercise {
  pub fn new(name: &str, muscle_group: MuscleGroup) -> Self {
    Self {
      name: name.to_string(),
      muscle_group,
      is_bodyweight: false,
    }
  }

  pub fn bodyweight(name: &str, muscle_group: MuscleGroup) -> Self {
    Self {
      is_bodyweight: true,
      ..Self::new(name, muscle_group)
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
  pub name: String,
  #[serde(default)]
  pub exercises: Vec<PlannedExercise>,
}

impl PlanDay {
  pub fn rest(name: &str) -> Self {
    Self {
      name: name.to_string(),
      exercises: Vec::new(),
    }
  }

  pub fn is_rest_day(&self) -> bool {
    self.exercises.is_empty()
  }
}

/// A weekly plan; `days[0]` is Monday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub name: String,
  #[serde(default)]
  pub active: bool,
  #[serde(default)]
  pub days: Vec<PlanDay>,
}

impl WorkoutPlan {
  pub fn day(&self, index: usize) -> Option<&PlanDay> {
    self.days.get(index)
  }
}
