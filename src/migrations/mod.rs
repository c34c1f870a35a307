// Migration orchestrator
// Embedded in the application binary for distroless container compatibility

pub mod diesel;

use std::error::Error;
use tracing::{error, info, warn};

use crate::app_config::AppConfig;

/// Configuration for migration execution
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub database_url: String,
    pub environment: String,
}

impl MigrationConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            database_url: config.database_url.clone(),
            environment: config.environment.to_string(),
        }
    }
}

/// Apply pending schema migrations
pub async fn run_all_migrations(config: MigrationConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!(
        "[MIGRATIONS] Starting migration process for environment: {}",
        config.environment
    );

    match diesel::run_migrations(config.database_url).await {
        Ok(0) => info!("[MIGRATIONS] Diesel migrations up to date"),
        Ok(applied_count) => info!("[MIGRATIONS] Applied {} Diesel migrations", applied_count),
        Err(e) => {
            error!("[MIGRATIONS] Diesel migration failed: {}", e);
            return Err(format!("Diesel migration failed: {}", e).into());
        },
    }

    Ok(())
}

/// Check if migrations should run based on environment variables
pub fn should_run_migrations(config: &AppConfig) -> bool {
    !config.disable_embedded_migrations
}

/// Warn about pending migrations when embedded migrations are disabled
pub async fn report_pending_migrations(config: &MigrationConfig) {
    match diesel::check_migration_status(config.database_url.clone()).await {
        Ok(status) if status.is_up_to_date() => {
            info!("[MIGRATIONS] {} migrations applied, none pending", status.applied_count)
        },
        Ok(status) => warn!(
            "[MIGRATIONS] {} pending migrations: {}",
            status.pending_migrations.len(),
            status.pending_migrations.join(", ")
        ),
        Err(e) => warn!("[MIGRATIONS] Could not read migration status: {}", e),
    }
}
