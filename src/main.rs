use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use device_access_core::{
    app_config, build_router, db::mask_connection_string, initialize_app_state,
    middleware::cors_layer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "device_access_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = app_config::config();
    info!(
        "Starting device access service ({}) on {}",
        config.environment, config.server.bind_address
    );
    info!("Database URL: {}", mask_connection_string(&config.database_url));

    let state = initialize_app_state(config)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to initialize application state")?;

    let app = build_router(state).layer(cors_layer(
        &config.cors_allowed_origins,
        config.is_production(),
    ));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    info!("Listening on {}", config.server.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
