// Login location verification endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{headers::UserAgent, TypedHeader};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    app::AppState,
    services::location::extract_client_ip,
    utils::{service_error::ServiceError, trim_optional_field},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLoginLocationRequest {
    #[validate(length(min = 1, max = 320))]
    pub email: String,
    #[validate(length(max = 1024))]
    pub user_agent: Option<String>,
}

/// Check the caller's IP against the login geofence
/// POST /v1/auth/verify-login-location
///
/// The client IP is taken from proxy headers, never from the body.
#[utoipa::path(
    post,
    path = "/v1/auth/verify-login-location",
    tag = "Authentication",
    operation_id = "verifyLoginLocation",
    request_body = VerifyLoginLocationRequest,
    responses(
        (status = 200, description = "Verification result; see `allowed`", body = crate::services::LocationVerification),
        (status = 400, description = "Malformed request")
    )
)]
pub async fn verify_login_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    user_agent: Option<TypedHeader<UserAgent>>,
    payload: Result<Json<VerifyLoginLocationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return ServiceError::from(rejection).into_response(),
    };

    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let ip = extract_client_ip(&headers);
    let user_agent = trim_optional_field(request.user_agent)
        .or_else(|| user_agent.map(|TypedHeader(ua)| ua.as_str().to_string()));

    let verification = state
        .location_verification
        .verify(request.email.trim(), ip, user_agent)
        .await;

    Json(verification).into_response()
}
