pub mod analysis;
pub mod backup;
pub mod body;
pub mod coach;
pub mod commands;
pub mod config;
pub mod db;
pub mod equipment;
pub mod error;
pub mod estimator;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod muscle;
pub mod personal_records;
pub mod plans;
pub mod progression;
pub mod repair;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use config::AppConfig;
pub use db::AppState;
pub use error::{GymLogError, Result};

use chrono::Local;
use std::sync::Arc;

/// Load configuration, open the database and take today's automatic backup.
///
/// A failed automatic backup is logged and does not stop startup.
pub async fn run() -> Result<Arc<AppState>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  config.logging.init();

  let state = AppState::open(config).await?;
  {
    let data = state.data.lock().await;
    if let Err(e) = backup::maybe_auto_backup(&state.store, &data, Local::now(), state.config.auto_backup_limit).await {
      tracing::warn!(error = %e, "Automatic backup failed");
    }
  }

  tracing::info!(db = %state.config.db_path, "Gym log ready");
  Ok(Arc::new(state))
}
