//! Backup export/restore and the daily automatic snapshots
//!
//! A backup is one JSON document with an optional section per collection.
//! Restoring applies whichever sections are present, then repairs history
//! and rebuilds the record table from it.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::body::BodyStat;
use crate::equipment::Equipment;
use crate::error::{GymLogError, Result};
use crate::models::{HistoryEntry, PersonalRecordTable, WorkoutPlan};
use crate::personal_records::rebuild_all_records;
use crate::plans::{default_plans, normalize_active};
use crate::progression::PendingSuggestions;
use crate::repair::repair_history;
use crate::state::GymData;
use crate::storage::{keys, KvStore};

pub const BACKUP_VERSION: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
  #[serde(default)]
  pub version: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub history: Option<Vec<HistoryEntry>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prs: Option<PersonalRecordTable>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub plans: Option<Vec<WorkoutPlan>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<Vec<BodyStat>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub equipment: Option<Equipment>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suggestions: Option<PendingSuggestions>,
}

/// Snapshot every collection
pub fn export_backup(data: &GymData) -> BackupFile {
  BackupFile {
    version: BACKUP_VERSION,
    history: Some(data.history.clone()),
    prs: Some(data.personal_records.clone()),
    plans: Some(data.plans.clone()),
    body: Some(data.body_stats.clone()),
    equipment: Some(data.equipment.clone()),
    suggestions: Some(data.pending_suggestions.clone()),
  }
}

pub fn export_backup_json(data: &GymData) -> Result<String> {
  Ok(serde_json::to_string_pretty(&export_backup(data))?)
}

/// Parse and apply a backup document. Returns the restored section names.
pub fn restore_backup(data: &mut GymData, json: &str) -> Result<Vec<&'static str>> {
  let file: BackupFile =
    serde_json::from_str(json).map_err(|e| GymLogError::InvalidBackup(format!("unreadable backup: {}", e)))?;
  apply_backup(data, file)
}

/// Apply the sections present in `file`.
///
/// The record table is always rebuilt from the resulting history; a `prs`
/// section is accepted but superseded by that rebuild.
pub fn apply_backup(data: &mut GymData, file: BackupFile) -> Result<Vec<&'static str>> {
  let mut restored = Vec::new();

  if let Some(history) = file.history {
    data.history = history;
    restored.push("history");
  }
  if let Some(prs) = file.prs {
    data.personal_records = prs;
    restored.push("prs");
  }
  if let Some(plans) = file.plans {
    data.plans = plans;
    restored.push("plans");
  }
  if let Some(body) = file.body {
    data.body_stats = body;
    restored.push("body");
  }
  if let Some(equipment) = file.equipment {
    data.equipment = equipment;
    restored.push("equipment");
  }
  if let Some(suggestions) = file.suggestions {
    data.pending_suggestions = suggestions;
    restored.push("suggestions");
  }

  if restored.is_empty() {
    return Err(GymLogError::InvalidBackup("no recognised data in backup".to_string()));
  }

  data.history.sort_by(|a, b| b.id.cmp(&a.id));
  data.body_stats.sort_by(|a, b| b.date.cmp(&a.date));
  repair_history(&mut data.history);
  data.personal_records = rebuild_all_records(&data.history);
  if data.plans.is_empty() {
    data.plans = default_plans();
  }
  normalize_active(&mut data.plans);

  tracing::info!(sections = ?restored, entries = data.history.len(), "Restored backup");
  Ok(restored)
}

/// ---------------------------------------------------------------------------
/// Automatic Backups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoBackup {
  pub timestamp: DateTime<Utc>,
  pub data: BackupFile,
}

/// Newest first
pub async fn list_auto_backups(store: &KvStore) -> Vec<AutoBackup> {
  store.load(keys::AUTO_BACKUPS, Vec::new()).await
}

/// Take a snapshot and keep only the newest `limit`.
///
/// Skipped when there is neither history nor a plan worth saving.
pub async fn create_auto_backup(
  store: &KvStore,
  data: &GymData,
  now: DateTime<Utc>,
  limit: usize,
) -> Result<bool> {
  if data.history.is_empty() && data.plans.is_empty() {
    tracing::debug!("Nothing to back up");
    return Ok(false);
  }

  let mut backups = list_auto_backups(store).await;
  backups.insert(
    0,
    AutoBackup {
      timestamp: now,
      data: export_backup(data),
    },
  );
  backups.truncate(limit);

  save_auto_backups(store, &backups).await?;
  tracing::info!(kept = backups.len(), "Created automatic backup");
  Ok(true)
}

/// At most one automatic backup per local calendar day
pub async fn maybe_auto_backup(
  store: &KvStore,
  data: &GymData,
  now: DateTime<Local>,
  limit: usize,
) -> Result<bool> {
  let today = now.date_naive().format("%Y-%m-%d").to_string();
  let last: Option<String> = store.load(keys::LAST_AUTO_BACKUP_DATE, None).await;
  if last.as_deref() == Some(today.as_str()) {
    return Ok(false);
  }

  let created = create_auto_backup(store, data, now.with_timezone(&Utc), limit).await?;
  if !store.save(keys::LAST_AUTO_BACKUP_DATE, &today).await {
    return Err(GymLogError::Storage(format!("failed to write {}", keys::LAST_AUTO_BACKUP_DATE)));
  }
  Ok(created)
}

pub async fn restore_auto_backup(
  store: &KvStore,
  data: &mut GymData,
  timestamp: DateTime<Utc>,
) -> Result<Vec<&'static str>> {
  let backup = list_auto_backups(store)
    .await
    .into_iter()
    .find(|b| b.timestamp == timestamp)
    .ok_or_else(|| GymLogError::NotFound(format!("automatic backup from {}", timestamp)))?;
  apply_backup(data, backup.data)
}

pub async fn delete_auto_backup(store: &KvStore, timestamp: DateTime<Utc>) -> Result<()> {
  let mut backups = list_auto_backups(store).await;
  let before = backups.len();
  backups.retain(|b| b.timestamp != timestamp);
  if backups.len() == before {
    return Err(GymLogError::NotFound(format!("automatic backup from {}", timestamp)));
  }
  save_auto_backups(store, &backups).await
}

async fn save_auto_backups(store: &KvStore, backups: &[AutoBackup]) -> Result<()> {
  if store.save(keys::AUTO_BACKUPS, backups).await {
    Ok(())
  } else {
    Err(GymLogError::Storage(format!("failed to write {}", keys::AUTO_BACKUPS)))
  }
}
