use super::CommandResult;
use crate::db::AppState;
use crate::models::{PlannedExercise, WorkoutPlan};
use crate::muscle::{infer_muscle_group, MuscleGroup};
use crate::plans::{self, MoveDirection};

pub async fn get_plans(state: &AppState) -> CommandResult<Vec<WorkoutPlan>> {
  Ok(state.data.lock().await.plans.clone())
}

pub async fn create_plan(state: &AppState, name: String) -> CommandResult<usize> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  let index = plans::create_plan(&mut next.plans, &name)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(index)
}

pub async fn rename_plan(state: &AppState, plan_index: usize, name: String) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  plans::rename_plan(&mut next.plans, plan_index, &name)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn delete_plan(state: &AppState, plan_index: usize) -> CommandResult<WorkoutPlan> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  let removed = plans::delete_plan(&mut next.plans, plan_index)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(removed)
}

pub async fn set_active_plan(state: &AppState, plan_index: usize) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  plans::set_active_plan(&mut next.plans, plan_index)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn add_plan_exercise(
  state: &AppState,
  plan_index: usize,
  day_index: usize,
  name: String,
  muscle_group: Option<MuscleGroup>,
  is_bodyweight: bool,
) -> CommandResult<()> {
  let exercise = PlannedExercise {
    muscle_group: muscle_group.unwrap_or_else(|| infer_muscle_group(&name)),
    name,
    is_bodyweight,
  };

  let mut data = state.data.lock().await;
  let mut next = data.clone();
  plans::add_exercise(&mut next.plans, plan_index, day_index, exercise)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn remove_plan_exercise(
  state: &AppState,
  plan_index: usize,
  day_index: usize,
  exercise_index: usize,
) -> CommandResult<PlannedExercise> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  let removed = plans::remove_exercise(&mut next.plans, plan_index, day_index, exercise_index)?;
  next.persist_plans(&state.store).await?;
  *data = next;
  Ok(removed)
}

pub async fn move_plan_exercise(
  state: &AppState,
  plan_index: usize,
  day_index: usize,
  exercise_index: usize,
  direction: MoveDirection,
) -> CommandResult<bool> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  let moved = plans::move_exercise(&mut next.plans, plan_index, day_index, exercise_index, direction)?;
  if moved {
    next.persist_plans(&state.store).await?;
    *data = next;
  }
  Ok(moved)
}
