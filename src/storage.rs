//! Key-value persistence
//!
//! Every collection is stored as one JSON document under a fixed key, the
//! same layout the browser build kept in local storage. Missing or malformed
//! documents are never fatal: `load` falls back to the caller's default.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::DbPool;

/// Storage keys
pub mod keys {
  pub const HISTORY: &str = "gymLogHistory_v2";
  pub const PERSONAL_RECORDS: &str = "gymLogPRs_v4";
  pub const PR_MIGRATION_COMPLETE: &str = "gymPrMigrationComplete_v4";
  pub const PLANS: &str = "gymWorkoutPlans_v3";
  pub const EQUIPMENT: &str = "gymUserEquipment";
  pub const SUGGESTIONS: &str = "gymLogSuggestions";
  pub const BODY_STATS: &str = "gymBodyStats";
  pub const SETTINGS: &str = "gymAppSettings";
  pub const AUTO_BACKUPS: &str = "gymAutoBackups";
  pub const LAST_AUTO_BACKUP_DATE: &str = "gymLastAutoBackupDate";
}

#[derive(Debug, Clone)]
pub struct KvStore {
  pool: DbPool,
}

impl KvStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  /// Load and decode the document under `key`, or return `default`
  pub async fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
    let raw = match self.load_raw(key).await {
      Ok(Some(raw)) => raw,
      Ok(None) => return default,
      Err(e) => {
        tracing::warn!(key, error = %e, "Failed to read stored value");
        return default;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => value,
      Err(e) => {
        tracing::warn!(key, error = %e, "Stored value is malformed, using default");
        default
      }
    }
  }

  /// Encode and write `value` under `key`. Returns false on failure.
  pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
    let json = match serde_json::to_string(value) {
      Ok(json) => json,
      Err(e) => {
        tracing::error!(key, error = %e, "Failed to encode value");
        return false;
      }
    };

    let result = sqlx::query(
      r#"
      INSERT INTO kv_store (key, value, updated_at)
      VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(&json)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => {
        tracing::debug!(key, bytes = json.len(), "Saved value");
        true
      }
      Err(e) => {
        tracing::error!(key, error = %e, "Failed to save value");
        false
      }
    }
  }

  pub async fn remove(&self, key: &str) -> bool {
    sqlx::query("DELETE FROM kv_store WHERE key = ?1")
      .bind(key)
      .execute(&self.pool)
      .await
      .map_err(|e| tracing::error!(key, error = %e, "Failed to remove value"))
      .is_ok()
  }

  async fn load_raw(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await
  }
}
