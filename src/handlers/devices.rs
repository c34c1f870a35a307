// Device access gate endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{headers::UserAgent, TypedHeader};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    services::{
        location::{extract_client_ip, UNKNOWN_IP},
        DeviceAccessRequest, Locale,
    },
    utils::{service_error::ServiceError, trim_optional_field, validate_fingerprint},
};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckDeviceAccessRequest {
    pub user_id: Uuid,
    /// Lowercase hex SHA-256 produced by the client fingerprinting
    #[validate(custom = "validate_fingerprint")]
    pub device_fingerprint: String,
    /// Signal bundle as collected by the client; stored for display only
    #[serde(default)]
    #[schema(value_type = Object)]
    pub device_info: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub geolocation: Option<serde_json::Value>,
    #[validate(length(max = 64))]
    pub ip_address: Option<String>,
    #[validate(length(max = 1024))]
    pub user_agent: Option<String>,
    /// `ar` or `en`; language of the denial reason
    pub locale: Option<String>,
}

// =============================================================================
// DEVICE HANDLERS
// =============================================================================

/// Decide whether a device may open a session for a user
/// POST /v1/devices/check-access
#[utoipa::path(
    post,
    path = "/v1/devices/check-access",
    tag = "Devices",
    operation_id = "checkDeviceAccess",
    request_body = CheckDeviceAccessRequest,
    responses(
        (status = 200, description = "Decision made; see `allowed`", body = crate::services::AccessDecision),
        (status = 400, description = "Invalid request or the check could not be completed")
    )
)]
pub async fn check_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    user_agent: Option<TypedHeader<UserAgent>>,
    payload: Result<Json<CheckDeviceAccessRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return ServiceError::from(rejection).into_response(),
    };

    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let header_ip = extract_client_ip(&headers);
    let ip_address = trim_optional_field(request.ip_address)
        .or_else(|| (header_ip != UNKNOWN_IP).then_some(header_ip));
    let user_agent = trim_optional_field(request.user_agent)
        .or_else(|| user_agent.map(|TypedHeader(ua)| ua.as_str().to_string()));

    let access_request = DeviceAccessRequest {
        user_id: request.user_id,
        device_fingerprint: request.device_fingerprint.to_lowercase(),
        device_info: request.device_info,
        geolocation: request.geolocation,
        ip_address,
        user_agent,
        locale: request.locale.as_deref().and_then(Locale::parse),
    };

    match state.device_access.check_access(access_request).await {
        Ok(decision) => {
            info!(
                "Device check for user {}: allowed={}",
                request.user_id, decision.allowed
            );
            Json(decision).into_response()
        },
        Err(e) => {
            error!("Device check for user {} failed: {}", request.user_id, e);
            ServiceError::from(e).into_response()
        },
    }
}
