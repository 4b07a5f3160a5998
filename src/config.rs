//! Runtime configuration read from the environment (and `.env` via dotenvy)

use std::env;
use std::str::FromStr;

use crate::error::{GymLogError, Result};
use crate::logging::LoggingConfig;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DB_PATH: &str = "gym-log.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_AUTO_BACKUP_LIMIT: usize = 5;
const DEFAULT_REST_SECONDS: u32 = 90;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// SQLite file path, or `:memory:`
  pub db_path: String,
  pub max_connections: u32,
  /// How many daily auto-backups to retain
  pub auto_backup_limit: usize,
  /// Rest timer length handed to the UI
  pub rest_timer_seconds: u32,
  pub logging: LoggingConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      db_path: DEFAULT_DB_PATH.to_string(),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      auto_backup_limit: DEFAULT_AUTO_BACKUP_LIMIT,
      rest_timer_seconds: DEFAULT_REST_SECONDS,
      logging: LoggingConfig::default(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    Ok(Self {
      db_path: env::var("GYM_LOG_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
      max_connections: parse_var("GYM_LOG_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
      auto_backup_limit: parse_var("GYM_LOG_AUTO_BACKUP_LIMIT", DEFAULT_AUTO_BACKUP_LIMIT)?,
      rest_timer_seconds: parse_var("GYM_LOG_REST_SECONDS", DEFAULT_REST_SECONDS)?,
      logging: LoggingConfig::from_env(),
    })
  }

  /// Connection URL for sqlx
  pub fn database_url(&self) -> String {
    if self.is_in_memory() {
      "sqlite::memory:".to_string()
    } else {
      format!("sqlite://{}?mode=rwc", self.db_path)
    }
  }

  pub fn is_in_memory(&self) -> bool {
    self.db_path == ":memory:"
  }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|_| GymLogError::Config(format!("{} must be a number, got {:?}", name, raw))),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(
      [
        "GYM_LOG_DB_PATH",
        "GYM_LOG_MAX_CONNECTIONS",
        "GYM_LOG_AUTO_BACKUP_LIMIT",
        "GYM_LOG_REST_SECONDS",
      ],
      || {
        let config = AppConfig::from_env().expect("defaults should parse");
        assert_eq!(config.db_path, "gym-log.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.auto_backup_limit, 5);
        assert_eq!(config.rest_timer_seconds, 90);
      },
    );
  }

  #[test]
  #[serial]
  fn test_reads_overrides() {
    temp_env::with_vars(
      [
        ("GYM_LOG_DB_PATH", Some(":memory:")),
        ("GYM_LOG_MAX_CONNECTIONS", Some("1")),
        ("GYM_LOG_AUTO_BACKUP_LIMIT", Some(" 3 ")),
      ],
      || {
        let config = AppConfig::from_env().expect("overrides should parse");
        assert!(config.is_in_memory());
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.auto_backup_limit, 3);
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_non_numeric() {
    temp_env::with_var("GYM_LOG_REST_SECONDS", Some("ninety"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, GymLogError::Config(_)));
      assert!(err.to_string().contains("GYM_LOG_REST_SECONDS"));
    });
  }

  #[test]
  fn test_file_database_url() {
    let config = AppConfig {
      db_path: "/tmp/gym.db".to_string(),
      ..AppConfig::default()
    };
    assert_eq!(config.database_url(), "sqlite:///tmp/gym.db?mode=rwc");
  }
}
