//! Crate-wide error type

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GymLogError {
  #[error("Storage error: {0}")]
  Storage(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Invalid backup: {0}")]
  InvalidBackup(String),

  #[error("Configuration error: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, GymLogError>;
