//! Placement Registry
//!
//! Bootstrap entry point: connects to the store, applies the schema and
//! reports what it holds.

use anyhow::Context;
use tracing::info;

use placement_registry::{
    config::Settings,
    database::{connection::{create_pool, run_migrations, DatabaseConfig}, DatabaseService},
    services::RegistryService,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", placement_registry::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    run_migrations(&pool).await?;

    let registry = RegistryService::new(DatabaseService::new(pool.clone()), &settings.store);
    registry.health_check().await?;

    let counts = registry.table_counts().await?;
    info!(
        enrollees = counts.enrollees,
        departments = counts.departments,
        organizations = counts.organizations,
        contacts = counts.contacts,
        "Registry ready"
    );

    pool.close().await;
    Ok(())
}
