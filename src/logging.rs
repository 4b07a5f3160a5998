//! Structured logging setup

use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  /// `JSON` lines, one event per line
  Json,
  /// Multi-line human readable output
  Pretty,
  /// Single-line output
  Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
  /// Default filter directive when `RUST_LOG` is unset
  pub level: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Compact,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let format = match env::var("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("pretty") => LogFormat::Pretty,
      _ => LogFormat::Compact,
    };
    Self { level, format }
  }

  /// Install the global subscriber.
  ///
  /// Returns false when a subscriber was already installed (tests, embedding shells).
  pub fn init(&self) -> bool {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
    // sqlx logs every statement at info
    if let Ok(directive) = "sqlx=warn".parse() {
      filter = filter.add_directive(directive);
    }

    let registry = tracing_subscriber::registry().with(filter);
    let result = match self.format {
      LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
      LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
      LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };
    result.is_ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_from_env_reads_format() {
    temp_env::with_vars([("LOG_FORMAT", Some("json")), ("RUST_LOG", Some("debug"))], || {
      let config = LoggingConfig::from_env();
      assert_eq!(config.format, LogFormat::Json);
      assert_eq!(config.level, "debug");
    });
  }

  #[test]
  #[serial]
  fn test_from_env_defaults_to_compact() {
    temp_env::with_vars_unset(["LOG_FORMAT", "RUST_LOG"], || {
      let config = LoggingConfig::from_env();
      assert_eq!(config, LoggingConfig::default());
    });
  }

  #[test]
  #[serial]
  fn test_second_init_is_harmless() {
    let config = LoggingConfig::default();
    config.init();
    assert!(!config.init());
  }
}
