//! In-memory copy of every stored collection
//!
//! Loaded once at startup, mutated by commands, and written back one
//! collection at a time through the `persist_*` methods.

use serde::{Deserialize, Serialize};

use crate::body::BodyStat;
use crate::equipment::Equipment;
use crate::error::{GymLogError, Result};
use crate::models::{HistoryEntry, PersonalRecordTable, WorkoutPlan};
use crate::personal_records::rebuild_all_records;
use crate::plans::{default_plans, normalize_active};
use crate::progression::PendingSuggestions;
use crate::repair::repair_history;
use crate::storage::{keys, KvStore};

/// User-facing toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
  #[serde(default = "enabled")]
  pub use_total_duration_timer: bool,
  #[serde(default = "enabled")]
  pub use_rest_timer: bool,
}

fn enabled() -> bool {
  true
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      use_total_duration_timer: true,
      use_rest_timer: true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GymData {
  /// Newest first
  pub history: Vec<HistoryEntry>,
  pub personal_records: PersonalRecordTable,
  pub plans: Vec<WorkoutPlan>,
  pub equipment: Equipment,
  pub pending_suggestions: PendingSuggestions,
  /// Newest first
  pub body_stats: Vec<BodyStat>,
  pub settings: AppSettings,
}

impl GymData {
  /// Load every collection, repairing history and seeding defaults
  pub async fn load(store: &KvStore) -> Result<Self> {
    let mut data = Self {
      history: store.load(keys::HISTORY, Vec::new()).await,
      personal_records: store.load(keys::PERSONAL_RECORDS, PersonalRecordTable::new()).await,
      plans: store.load(keys::PLANS, Vec::new()).await,
      equipment: store.load(keys::EQUIPMENT, Equipment::default()).await,
      pending_suggestions: store.load(keys::SUGGESTIONS, PendingSuggestions::default()).await,
      body_stats: store.load(keys::BODY_STATS, Vec::new()).await,
      settings: store.load(keys::SETTINGS, AppSettings::default()).await,
    };

    data.history.sort_by(|a, b| b.id.cmp(&a.id));
    if repair_history(&mut data.history) {
      data.persist_history(store).await?;
    }

    // Records saved before rep PRs were keyed by exact weight are rebuilt once
    let migrated: bool = store.load(keys::PR_MIGRATION_COMPLETE, false).await;
    if !migrated {
      data.personal_records = rebuild_all_records(&data.history);
      data.persist_personal_records(store).await?;
      save(store, keys::PR_MIGRATION_COMPLETE, &true).await?;
      tracing::info!("Personal record migration complete");
    }

    if data.plans.is_empty() {
      data.plans = default_plans();
      data.persist_plans(store).await?;
    } else if data.plans.iter().filter(|p| p.active).count() != 1 {
      normalize_active(&mut data.plans);
      data.persist_plans(store).await?;
    }

    tracing::info!(
      entries = data.history.len(),
      records = data.personal_records.len(),
      plans = data.plans.len(),
      "Loaded gym data"
    );
    Ok(data)
  }

  pub fn active_plan_index(&self) -> Option<usize> {
    self.plans.iter().position(|p| p.active)
  }

  pub fn active_plan(&self) -> Option<&WorkoutPlan> {
    self.plans.iter().find(|p| p.active)
  }

  /// ---------------------------------------------------------------------------
  /// Persistence
  /// ---------------------------------------------------------------------------

  pub async fn persist_history(&self, store: &KvStore) -> Result<()> {
    save(store, keys::HISTORY, &self.history).await
  }

  pub async fn persist_personal_records(&self, store: &KvStore) -> Result<()> {
    save(store, keys::PERSONAL_RECORDS, &self.personal_records).await
  }

  pub async fn persist_plans(&self, store: &KvStore) -> Result<()> {
    save(store, keys::PLANS, &self.plans).await
  }

  pub async fn persist_equipment(&self, store: &KvStore) -> Result<()> {
    save(store, keys::EQUIPMENT, &self.equipment).await
  }

  pub async fn persist_suggestions(&self, store: &KvStore) -> Result<()> {
    save(store, keys::SUGGESTIONS, &self.pending_suggestions).await
  }

  pub async fn persist_body_stats(&self, store: &KvStore) -> Result<()> {
    save(store, keys::BODY_STATS, &self.body_stats).await
  }

  pub async fn persist_settings(&self, store: &KvStore) -> Result<()> {
    save(store, keys::SETTINGS, &self.settings).await
  }

  /// Write every collection, used after a restore
  pub async fn persist_all(&self, store: &KvStore) -> Result<()> {
    self.persist_history(store).await?;
    self.persist_personal_records(store).await?;
    self.persist_plans(store).await?;
    self.persist_equipment(store).await?;
    self.persist_suggestions(store).await?;
    self.persist_body_stats(store).await?;
    self.persist_settings(store).await
  }
}

async fn save<T: Serialize + ?Sized>(store: &KvStore, key: &str, value: &T) -> Result<()> {
  if store.save(key, value).await {
    Ok(())
  } else {
    Err(GymLogError::Storage(format!("failed to write {}", key)))
  }
}
