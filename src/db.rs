use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::error::Result;
use crate::session::WorkoutSession;
use crate::state::GymData;
use crate::storage::KvStore;

pub type DbPool = SqlitePool;

/// Application state shared by every command.
///
/// Lock order is `data` then `session`. A command holds the locks until the
/// mutated collections have been written back through `store`.
pub struct AppState {
  pub store: KvStore,
  pub config: AppConfig,
  pub data: Mutex<GymData>,
  pub session: Mutex<WorkoutSession>,
}

impl AppState {
  /// Open the database, run migrations and load every collection into memory
  pub async fn open(config: AppConfig) -> Result<Self> {
    let pool = initialize_db(&config).await?;
    Self::from_pool(pool, config).await
  }

  pub async fn from_pool(pool: DbPool, config: AppConfig) -> Result<Self> {
    let store = KvStore::new(pool);
    let data = GymData::load(&store).await?;
    Ok(Self {
      store,
      config,
      data: Mutex::new(data),
      session: Mutex::new(WorkoutSession::default()),
    })
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool> {
  let db_url = config.database_url();
  tracing::info!(path = %config.db_path, "Initializing database");

  // Every in-memory connection is its own database
  let max_connections = if config.is_in_memory() { 1 } else { config.max_connections };

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}
