//! Workout plan management
//!
//! Plans are a week of days, Monday first. Exactly one plan is active; the
//! coach reads it, nothing else here is consumed by the engine.

use serde::{Deserialize, Serialize};

use crate::error::{GymLogError, Result};
use crate::models::{PlanDay, PlannedExercise, WorkoutPlan};
use crate::muscle::MuscleGroup;

const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
  Up,
  Down,
}

/// The four-day upper/lower template installed on first launch
pub fn default_plans() -> Vec<WorkoutPlan> {
  use MuscleGroup::*;

  let day = |name: &str, exercises: &[(&str, MuscleGroup)]| PlanDay {
    name: name.to_string(),
    exercises: exercises
      .iter()
      .map(|(exercise, group)| PlannedExercise::new(exercise, *group))
      .collect(),
  };

  vec![WorkoutPlan {
    name: "4-Day Starter Plan".to_string(),
    active: true,
    days: vec![
      day(
        "Upper A (Mon)",
        &[
          ("Incline Dumbbell Press", Chest),
          ("One-arm Dumbbell Row", Back),
          ("Dumbbell Lateral Raise", Shoulders),
          ("Dumbbell Curl", Arms),
          ("Overhead Triceps Extension", Arms),
        ],
      ),
      day(
        "Lower A (Tue)",
        &[
          ("Goblet Squat", Legs),
          ("Dumbbell Romanian Deadlift (RDL)", Legs),
          ("Hip Thrust", Legs),
          ("Calf Raise", Legs),
        ],
      ),
      PlanDay::rest("Rest (Wed)"),
      day(
        "Upper B (Thu)",
        &[
          ("Flat Dumbbell Press", Chest),
          ("Pull-up / Band Pull-down", Back),
          ("Dumbbell Shoulder Press", Shoulders),
          ("Dumbbell Hammer Curl", Arms),
          ("Bench Dips", Chest),
        ],
      ),
      day(
        "Lower B (Fri)",
        &[
          ("Bulgarian Split Squat", Legs),
          ("Sumo Goblet Squat", Legs),
          ("Dumbbell Step-up", Legs),
          ("Standing Calf Raise", Legs),
        ],
      ),
      PlanDay::rest("Rest (Sat)"),
      PlanDay::rest("Rest (Sun)"),
    ],
  }]
}

/// Make sure exactly one plan is active, preferring the first flagged one.
/// Returns the active index, or None when there are no plans.
pub fn normalize_active(plans: &mut [WorkoutPlan]) -> Option<usize> {
  if plans.is_empty() {
    return None;
  }
  let active = plans.iter().position(|p| p.active).unwrap_or(0);
  for (i, plan) in plans.iter_mut().enumerate() {
    plan.active = i == active;
  }
  Some(active)
}

fn plan_mut(plans: &mut [WorkoutPlan], plan_index: usize) -> Result<&mut WorkoutPlan> {
  plans
    .get_mut(plan_index)
    .ok_or_else(|| GymLogError::NotFound(format!("plan {}", plan_index)))
}

fn day_mut(plans: &mut [WorkoutPlan], plan_index: usize, day_index: usize) -> Result<&mut PlanDay> {
  plan_mut(plans, plan_index)?
    .days
    .get_mut(day_index)
    .ok_or_else(|| GymLogError::NotFound(format!("day {} of plan {}", day_index, plan_index)))
}

fn required_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(GymLogError::InvalidInput("name must not be empty".to_string()));
  }
  Ok(name.to_string())
}

/// Append an inactive plan with seven empty days. Returns its index.
pub fn create_plan(plans: &mut Vec<WorkoutPlan>, name: &str) -> Result<usize> {
  let name = required_name(name)?;
  plans.push(WorkoutPlan {
    name,
    active: false,
    days: WEEKDAYS.iter().map(|d| PlanDay::rest(d)).collect(),
  });
  tracing::info!(plans = plans.len(), "Created plan");
  Ok(plans.len() - 1)
}

pub fn rename_plan(plans: &mut [WorkoutPlan], plan_index: usize, name: &str) -> Result<()> {
  let name = required_name(name)?;
  plan_mut(plans, plan_index)?.name = name;
  Ok(())
}

/// Delete a plan. The last remaining plan cannot be deleted; if the active
/// plan goes, the first remaining one takes over.
pub fn delete_plan(plans: &mut Vec<WorkoutPlan>, plan_index: usize) -> Result<WorkoutPlan> {
  if plan_index >= plans.len() {
    return Err(GymLogError::NotFound(format!("plan {}", plan_index)));
  }
  if plans.len() <= 1 {
    return Err(GymLogError::InvalidInput("at least one plan must remain".to_string()));
  }

  let removed = plans.remove(plan_index);
  if removed.active || !plans.iter().any(|p| p.active) {
    plans[0].active = true;
  }
  tracing::info!(plan = %removed.name, "Deleted plan");
  Ok(removed)
}

pub fn set_active_plan(plans: &mut [WorkoutPlan], plan_index: usize) -> Result<()> {
  if plan_index >= plans.len() {
    return Err(GymLogError::NotFound(format!("plan {}", plan_index)));
  }
  for (i, plan) in plans.iter_mut().enumerate() {
    plan.active = i == plan_index;
  }
  Ok(())
}

pub fn add_exercise(
  plans: &mut [WorkoutPlan],
  plan_index: usize,
  day_index: usize,
  exercise: PlannedExercise,
) -> Result<()> {
  let name = required_name(&exercise.name)?;
  day_mut(plans, plan_index, day_index)?
    .exercises
    .push(PlannedExercise { name, ..exercise });
  Ok(())
}

pub fn remove_exercise(
  plans: &mut [WorkoutPlan],
  plan_index: usize,
  day_index: usize,
  exercise_index: usize,
) -> Result<PlannedExercise> {
  let day = day_mut(plans, plan_index, day_index)?;
  if exercise_index >= day.exercises.len() {
    return Err(GymLogError::NotFound(format!("exercise {} of day {}", exercise_index, day_index)));
  }
  Ok(day.exercises.remove(exercise_index))
}

/// Swap an exercise with its neighbour. Moving past either end does nothing.
pub fn move_exercise(
  plans: &mut [WorkoutPlan],
  plan_index: usize,
  day_index: usize,
  exercise_index: usize,
  direction: MoveDirection,
) -> Result<bool> {
  let exercises = &mut day_mut(plans, plan_index, day_index)?.exercises;
  let target = match direction {
    MoveDirection::Up => exercise_index.checked_sub(1),
    MoveDirection::Down => exercise_index.checked_add(1),
  };
  match target {
    Some(target) if target < exercises.len() && exercise_index < exercises.len() => {
      exercises.swap(exercise_index, target);
      Ok(true)
    }
    _ => Ok(false),
  }
}
