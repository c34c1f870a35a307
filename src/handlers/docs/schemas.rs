// OpenAPI schema definitions

use serde_json::json;
use utoipa::OpenApi;

use crate::{
    handlers::{devices::CheckDeviceAccessRequest, location::VerifyLoginLocationRequest},
    models::UserDevice,
    services::{AccessDecision, GeoLocation, Locale, LocationVerification},
};

/// utoipa document for the device gate and login location endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::devices::check_access,
        crate::handlers::location::verify_login_location,
    ),
    components(
        schemas(
            CheckDeviceAccessRequest,
            AccessDecision,
            UserDevice,
            VerifyLoginLocationRequest,
            LocationVerification,
            GeoLocation,
            Locale,
        )
    ),
    tags(
        (name = "Devices", description = "Per-user device access gate"),
        (name = "Authentication", description = "Login location verification")
    )
)]
pub struct DeviceApiDoc;

/// Paths generated from the handler annotations
pub fn generated_paths() -> serde_json::Value {
    serde_json::to_value(DeviceApiDoc::openapi().paths).unwrap_or_else(|_| json!({}))
}

/// Return all schema definitions including utoipa-generated ones
pub fn all_schemas() -> serde_json::Value {
    let mut schemas = json!({
        "ErrorResponse": error_response_schema(),
    });

    let openapi = DeviceApiDoc::openapi();
    if let Some(components) = openapi.components {
        if let serde_json::Value::Object(ref mut map) = schemas {
            for (key, schema) in components.schemas {
                map.insert(key, serde_json::to_value(schema).unwrap_or_default());
            }
        }
    }

    schemas
}

fn error_response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["error", "status"],
        "properties": {
            "error": {
                "type": "string",
                "description": "Human-readable failure description"
            },
            "status": {
                "type": "integer",
                "description": "HTTP status code, always 400"
            }
        }
    })
}
