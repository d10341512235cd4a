//! Database connection management

use sqlx::{Pool, Postgres, Transaction};
use std::time::Duration;

use crate::config::{IsolationLevel, DatabaseConfig as DatabaseSettings};
use crate::utils::errors::RegistryError;

pub type DatabasePool = Pool<Postgres>;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/placement".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            acquire_timeout: Duration::from_secs(settings.acquire_timeout_seconds),
            ..Self::default()
        }
    }
}

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, RegistryError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Apply the embedded schema
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), RegistryError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), RegistryError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}

/// Begin a transaction at the given isolation level
pub async fn begin_with_isolation(
    pool: &DatabasePool,
    isolation: IsolationLevel,
) -> Result<Transaction<'static, Postgres>, RegistryError> {
    let mut tx = pool.begin().await?;

    sqlx::query(isolation.set_transaction_sql())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
