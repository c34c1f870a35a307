// Library exports for the device access service
// Router and state construction live here so tests and the binary share them

pub mod app;
pub mod app_config;
pub mod db;
pub mod fingerprint;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use services::{
    AccessDecision, DeviceAccessRequest, DeviceAccessService, DeviceStore, GeoProvider,
    LocationVerification, LocationVerificationService, LoginSecurityStore,
};

// Re-export route builders
pub use handlers::{auth_routes, device_routes, docs_routes};

/// Assemble the HTTP surface
pub fn build_router(state: AppState) -> Router {
    let enable_docs = state.config.enable_swagger_ui;

    let mut router = Router::new()
        .nest("/v1/devices", device_routes())
        .nest("/v1/auth", auth_routes())
        .route("/health", get(handlers::health::health_check));

    if enable_docs {
        router = router.merge(docs_routes());
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Connect to PostgreSQL, apply migrations and wire the services
pub async fn initialize_app_state(
    config: &AppConfig,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    info!("Initializing database pool...");
    let db_config = DieselDatabaseConfig::from_config(&config.database);
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    let migration_config = migrations::MigrationConfig::from_config(config);
    if migrations::should_run_migrations(config) {
        info!("Running embedded migrations...");
        migrations::run_all_migrations(migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    } else {
        warn!("Embedded migrations disabled");
        migrations::report_pending_migrations(&migration_config).await;
    }

    let device_store = Arc::new(services::PgDeviceStore::new(diesel_pool.clone()));
    let security_store = Arc::new(services::PgLoginSecurityStore::new(diesel_pool.clone()));
    let geo_provider = Arc::new(services::IpApiProvider::new(
        &config.location_policy.geo_provider_url,
        config.location_policy.lookup_timeout(),
    ));

    let device_access = Arc::new(DeviceAccessService::new(
        device_store,
        config.device_policy.clone(),
    ));
    let location_verification = Arc::new(LocationVerificationService::new(
        geo_provider,
        security_store,
        config.location_policy.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        device_access,
        location_verification,
        max_connections,
    })
}
