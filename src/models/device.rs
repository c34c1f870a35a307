// User device registry model
// One row per known (user, fingerprint) pair

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::user_devices;

/// A device registered to a user
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, ToSchema,
)]
#[diesel(table_name = user_devices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserDevice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_fingerprint: String,
    pub device_name: Option<String>,
    #[schema(value_type = Object)]
    pub device_info: serde_json::Value,
    pub is_active: bool,
    pub is_primary: bool,
    pub login_count: i32,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New device row. Only ever built for a user's first device.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_devices)]
pub struct NewUserDevice {
    pub user_id: Uuid,
    pub device_fingerprint: String,
    pub device_name: Option<String>,
    pub device_info: serde_json::Value,
    pub is_active: bool,
    pub is_primary: bool,
    pub login_count: i32,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl NewUserDevice {
    /// Build the record for a user's first ever device
    pub fn primary(
        user_id: Uuid,
        device_fingerprint: String,
        device_name: Option<String>,
        device_info: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            device_fingerprint,
            device_name,
            device_info,
            is_active: true,
            is_primary: true,
            login_count: 1,
            first_seen_at: now,
            last_seen_at: now,
        }
    }
}
