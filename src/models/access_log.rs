// Device access audit trail
// Append-only: one row per policy evaluation

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::device_access_log;

/// Outcome category recorded for an access attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    LoginSuccess,
    LoginBlocked,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::LoginSuccess => "login_success",
            AccessType::LoginBlocked => "login_blocked",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "login_success" => Ok(AccessType::LoginSuccess),
            "login_blocked" => Ok(AccessType::LoginBlocked),
            _ => Err(format!("Invalid access type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = device_access_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeviceAccessLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_id: Option<Uuid>,
    pub device_fingerprint: String,
    pub access_type: String,
    pub was_allowed: bool,
    pub reason: Option<String>,
    pub geolocation: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Insertable)]
#[diesel(table_name = device_access_log)]
pub struct NewDeviceAccessLogEntry {
    pub user_id: Uuid,
    pub device_id: Option<Uuid>,
    pub device_fingerprint: String,
    pub access_type: String,
    pub was_allowed: bool,
    pub reason: Option<String>,
    pub geolocation: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewDeviceAccessLogEntry {
    pub fn access_type(&self) -> Option<AccessType> {
        AccessType::from_string(&self.access_type).ok()
    }
}
