use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::CommandResult;
use crate::backup::{self, AutoBackup};
use crate::db::AppState;

/// Listing row for an automatic backup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoBackupInfo {
  pub timestamp: DateTime<Utc>,
  pub history_entries: usize,
}

impl From<&AutoBackup> for AutoBackupInfo {
  fn from(b: &AutoBackup) -> Self {
    Self {
      timestamp: b.timestamp,
      history_entries: b.data.history.as_ref().map_or(0, Vec::len),
    }
  }
}

/// Backup document as pretty-printed JSON
pub async fn export_backup(state: &AppState) -> CommandResult<String> {
  let data = state.data.lock().await;
  Ok(backup::export_backup_json(&data)?)
}

/// Restore from a backup document and write every collection back
pub async fn import_backup(state: &AppState, json: String) -> CommandResult<Vec<&'static str>> {
  let mut data = state.data.lock().await;

  // Work on a copy so a rejected document leaves state untouched
  let mut restored = data.clone();
  let sections = backup::restore_backup(&mut restored, &json)?;
  restored.persist_all(&state.store).await?;
  *data = restored;
  Ok(sections)
}

pub async fn list_auto_backups(state: &AppState) -> CommandResult<Vec<AutoBackupInfo>> {
  let backups = backup::list_auto_backups(&state.store).await;
  Ok(backups.iter().map(AutoBackupInfo::from).collect())
}

/// Take today's automatic backup if it has not been taken yet
pub async fn run_auto_backup(state: &AppState) -> CommandResult<bool> {
  let data = state.data.lock().await;
  Ok(backup::maybe_auto_backup(&state.store, &data, Local::now(), state.config.auto_backup_limit).await?)
}

pub async fn restore_auto_backup(state: &AppState, timestamp: DateTime<Utc>) -> CommandResult<Vec<&'static str>> {
  let mut data = state.data.lock().await;

  let mut restored = data.clone();
  let sections = backup::restore_auto_backup(&state.store, &mut restored, timestamp).await?;
  restored.persist_all(&state.store).await?;
  *data = restored;
  Ok(sections)
}

pub async fn delete_auto_backup(state: &AppState, timestamp: DateTime<Utc>) -> CommandResult<()> {
  Ok(backup::delete_auto_backup(&state.store, timestamp).await?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::HistoryEntry;
  use crate::storage::keys;
  use crate::test_utils::{date, mock_entry, mock_strength, setup_test_state};

  #[tokio::test]
  async fn test_export_then_import_into_fresh_state() {
    let source = setup_test_state().await;
    {
      let mut data = source.data.lock().await;
      data.history = vec![mock_entry(date(2024, 5, 1), vec![mock_strength("Squat", &[(100.0, 5)])])];
    }
    let json = export_backup(&source).await.unwrap();

    let target = setup_test_state().await;
    let sections = import_backup(&target, json).await.unwrap();
    assert!(sections.contains(&"history"));

    let stored: Vec<HistoryEntry> = target.store.load(keys::HISTORY, Vec::new()).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(target.data.lock().await.personal_records["Squat"].max_weight, 100.0);
  }

  #[tokio::test]
  async fn test_rejected_import_keeps_state() {
    let state = setup_test_state().await;
    let before = state.data.lock().await.clone();

    let err = import_backup(&state, r#"{"unrelated": true}"#.into()).await.unwrap_err();
    assert!(err.message.contains("Invalid backup"));
    assert_eq!(*state.data.lock().await, before);
  }

  #[tokio::test]
  async fn test_auto_backup_listing() {
    let state = setup_test_state().await;
    assert!(run_auto_backup(&state).await.unwrap());
    assert!(!run_auto_backup(&state).await.unwrap());

    let backups = list_auto_backups(&state).await.unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].history_entries, 0);

    restore_auto_backup(&state, backups[0].timestamp).await.unwrap();
    delete_auto_backup(&state, backups[0].timestamp).await.unwrap();
    assert!(list_auto_backups(&state).await.unwrap().is_empty());
  }
}
