// Error responses for the HTTP layer
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{DeviceAccessError, StoreError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Device registration conflict, retry the login")]
    RegistrationConflict,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // The access gate reports every failure as a bad request; callers
        // must treat any error body as "not allowed"
        let status = StatusCode::BAD_REQUEST;
        let error_message = match self {
            ServiceError::DatabaseError(_) => "Device access check failed".to_string(),
            ServiceError::ValidationError(msg) => msg,
            ServiceError::RegistrationConflict => {
                "Device registration conflict, retry the login".to_string()
            },
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        ServiceError::DatabaseError(error.to_string())
    }
}

impl From<DeviceAccessError> for ServiceError {
    fn from(error: DeviceAccessError) -> Self {
        match error {
            DeviceAccessError::InvalidFingerprint => {
                ServiceError::ValidationError(error.to_string())
            },
            DeviceAccessError::Store(e) => e.into(),
            DeviceAccessError::RegistrationContention => ServiceError::RegistrationConflict,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}
