use super::CommandResult;
use crate::db::AppState;
use crate::ledger::{delete_entry, delete_exercise, delete_set};
use crate::models::HistoryEntry;

/// ---------------------------------------------------------------------------
/// History Deletes
/// ---------------------------------------------------------------------------

pub async fn delete_history_entry(state: &AppState, entry_index: usize) -> CommandResult<HistoryEntry> {
  let mut data = state.data.lock().await;

  let mut next = data.clone();
  let removed = delete_entry(&mut next.history, &mut next.personal_records, entry_index)?;
  next.persist_history(&state.store).await?;
  next.persist_personal_records(&state.store).await?;
  *data = next;
  Ok(removed)
}

pub async fn delete_history_exercise(
  state: &AppState,
  entry_index: usize,
  exercise_index: usize,
) -> CommandResult<()> {
  let mut data = state.data.lock().await;

  let mut next = data.clone();
  delete_exercise(&mut next.history, &mut next.personal_records, entry_index, exercise_index)?;
  next.persist_history(&state.store).await?;
  next.persist_personal_records(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn delete_history_set(
  state: &AppState,
  entry_index: usize,
  exercise_index: usize,
  set_index: usize,
) -> CommandResult<()> {
  let mut data = state.data.lock().await;

  let mut next = data.clone();
  delete_set(
    &mut next.history,
    &mut next.personal_records,
    entry_index,
    exercise_index,
    set_index,
  )?;
  next.persist_history(&state.store).await?;
  next.persist_personal_records(&state.store).await?;
  *data = next;
  Ok(())
}
