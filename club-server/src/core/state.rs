use sqlx::SqlitePool;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services;

/// Server state - shared by every handler
///
/// Cheap to clone: the config is small and the pool is reference counted.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Immutable settings |
/// | pool | SqlitePool | Embedded SQLite (WAL) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// Initialize server state
    ///
    /// In order:
    /// 1. work dir structure
    /// 2. database (migrations included)
    /// 3. bootstrap admin when the user table is empty
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_file();
        let db = DbService::new(&db_path.to_string_lossy()).await?;
        let state = Self::new(config.clone(), db.pool);

        services::roster::bootstrap_admin(&state.pool, &config.bootstrap_admin).await?;

        Ok(state)
    }

    /// Fee used when a member's dues year is first initialized
    pub fn monthly_fee(&self) -> f64 {
        self.config.dues_monthly_fee
    }
}
