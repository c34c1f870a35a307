use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::suspicious_login_attempts;

/// Severity recorded for an out-of-region login
pub const SEVERITY_HIGH: &str = "high";

/// Review state of a freshly recorded attempt
pub const REVIEW_PENDING: &str = "pending";

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = suspicious_login_attempts)]
pub struct NewSuspiciousLoginAttempt {
    pub user_id: Option<Uuid>,
    pub email: String,
    pub ip_address: String,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_agent: Option<String>,
    pub blocked: bool,
    pub severity: String,
    pub status: String,
}
