//! Command layer
//!
//! Async entry points a UI shell calls with the shared `AppState`. Each one
//! takes the locks it needs (data, then session), mutates, writes the touched
//! collections back, and only then returns.

pub mod analysis;
pub mod backup;
pub mod history;
pub mod plans;
pub mod settings;
pub mod workout;

use serde::Serialize;

use crate::db::AppState;
use crate::error::GymLogError;
use crate::models::{HistoryEntry, PersonalRecordTable};

/// Error shape handed back to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandError {
  pub message: String,
}

impl std::fmt::Display for CommandError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for CommandError {}

impl From<GymLogError> for CommandError {
  fn from(e: GymLogError) -> Self {
    match &e {
      GymLogError::NotFound(_) | GymLogError::InvalidInput(_) | GymLogError::InvalidBackup(_) => {
        tracing::debug!(error = %e, "Command rejected")
      }
      _ => tracing::error!(error = %e, "Command failed"),
    }
    Self { message: e.to_string() }
  }
}

pub type CommandResult<T> = Result<T, CommandError>;

pub async fn get_history(state: &AppState) -> CommandResult<Vec<HistoryEntry>> {
  Ok(state.data.lock().await.history.clone())
}

pub async fn get_personal_records(state: &AppState) -> CommandResult<PersonalRecordTable> {
  Ok(state.data.lock().await.personal_records.clone())
}
