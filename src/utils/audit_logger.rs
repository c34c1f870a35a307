// Audit trail on the "audit" tracing target
// Mirrors the persisted access log for log shipping
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::AccessType;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum AuditAction {
    DeviceAccessGranted,
    DeviceAccessDenied,
    LoginLocationBlocked,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub user_id: Option<Uuid>,
    pub resource_id: Option<String>,
    pub resource_type: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct AuditLogger;

impl AuditLogger {
    fn emit(audit_log: &AuditLog) {
        let json_log = serde_json::to_string(audit_log).unwrap_or_else(|e| {
            warn!("Failed to serialize audit log: {}", e);
            format!("{:?}", audit_log)
        });

        info!(target: "audit", "{}", json_log);
    }

    /// Log a device gate decision
    pub fn log_device_decision(
        access_type: AccessType,
        user_id: Uuid,
        device_id: Option<Uuid>,
        fingerprint: &str,
        reason: Option<&str>,
        ip_address: Option<&str>,
    ) {
        let action = match access_type {
            AccessType::LoginSuccess => AuditAction::DeviceAccessGranted,
            AccessType::LoginBlocked => AuditAction::DeviceAccessDenied,
        };

        // Only a prefix of the fingerprint goes to logs
        let short_fp: String = fingerprint.chars().take(12).collect();
        let details = match reason {
            Some(reason) => format!("fingerprint={} reason={}", short_fp, reason),
            None => format!("fingerprint={}", short_fp),
        };

        Self::emit(&AuditLog {
            id: Uuid::new_v4(),
            action,
            user_id: Some(user_id),
            resource_id: device_id.map(|id| id.to_string()),
            resource_type: "device".to_string(),
            details: Some(details),
            ip_address: ip_address.map(str::to_string),
            timestamp: Utc::now(),
        });
    }

    /// Log a login refused by the location geofence
    pub fn log_location_block(
        user_id: Option<Uuid>,
        email: &str,
        ip_address: &str,
        country_code: Option<&str>,
    ) {
        Self::emit(&AuditLog {
            id: Uuid::new_v4(),
            action: AuditAction::LoginLocationBlocked,
            user_id,
            resource_id: Some(email.to_string()),
            resource_type: "login".to_string(),
            details: country_code.map(|code| format!("country={}", code)),
            ip_address: Some(ip_address.to_string()),
            timestamp: Utc::now(),
        });
    }
}
