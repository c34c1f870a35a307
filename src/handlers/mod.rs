// HTTP handlers for the device gate and login location check

pub mod devices;
pub mod docs;
pub mod health;
pub mod location;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Device gate routes
pub fn device_routes() -> Router<AppState> {
    Router::new().route("/check-access", post(devices::check_access))
}

// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/verify-login-location", post(location::verify_login_location))
}

// Documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/api-docs/openapi.json", get(docs::serve_openapi_spec))
        .route("/docs", get(docs::serve_swagger_ui))
}
