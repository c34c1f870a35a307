use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

/// CORS policy for the login flow.
///
/// A `*` entry reflects the request origin outside production. Production
/// only honours explicitly listed origins.
pub fn cors_layer(allowed_origins: &[String], is_production: bool) -> CorsLayer {
    let has_wildcard = allowed_origins.iter().any(|o| o == "*");

    let allow_origin = if has_wildcard && !is_production {
        debug!("CORS: reflecting request origin");
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("CORS: ignoring invalid origin {}", o);
                    None
                },
            })
            .collect();
        debug!("CORS: {} whitelisted origins", origins.len());
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
        ])
        .max_age(Duration::from_secs(3600))
}
