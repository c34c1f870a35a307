// API Documentation handlers
pub mod health;
pub mod schemas;
pub mod swagger_ui;

use crate::app::AppState;
use crate::app_config::{AppConfig, Environment};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Serve OpenAPI JSON specification at /api-docs/openapi.json
pub async fn serve_openapi_spec(State(app_state): State<AppState>) -> Response {
    let spec = build_openapi_spec(app_state.config.as_ref());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&spec).unwrap_or_default(),
    )
        .into_response()
}

/// Re-export swagger UI handler
pub use swagger_ui::serve_swagger_ui;

/// Build the complete OpenAPI specification
pub fn build_openapi_spec(config: &AppConfig) -> serde_json::Value {
    let api_url = std::env::var("PUBLIC_API_URL").unwrap_or_else(|_| match config.environment {
        Environment::Development | Environment::Test => {
            format!("http://localhost:{}", config.port)
        },
        _ => "/".to_string(),
    });

    let mut paths = schemas::generated_paths();
    if let serde_json::Value::Object(ref mut map) = paths {
        map.insert("/health".to_string(), health::health_endpoint());
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Device Access API",
            "description": "Device fingerprint gate and login location verification for the police application",
            "version": env!("CARGO_PKG_VERSION")
        },
        "servers": [{
            "url": api_url,
            "description": format!("Current server ({})", config.environment)
        }],
        "tags": [
            {
                "name": "Devices",
                "description": "Per-user device access gate"
            },
            {
                "name": "Authentication",
                "description": "Login location verification"
            },
            {
                "name": "Health",
                "description": "Service health checks"
            }
        ],
        "paths": paths,
        "components": {
            "schemas": schemas::all_schemas()
        }
    })
}
