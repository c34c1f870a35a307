// Device access gate
// Decides whether a (user, fingerprint) pair may open a session and records
// every decision in the access log.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    app_config::DevicePolicyConfig,
    fingerprint::{is_valid_fingerprint, parse_user_agent, DeviceSignalBundle},
    models::{AccessType, NewDeviceAccessLogEntry, NewUserDevice, UserDevice},
    services::{
        device_store::{DeviceStore, FirstDeviceOutcome, StoreError},
        messages::{DeviceReason, Locale},
    },
    utils::audit_logger::AuditLogger,
};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceAccessError {
    #[error("Invalid device fingerprint")]
    InvalidFingerprint,

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Device registration kept conflicting with concurrent logins")]
    RegistrationContention,
}

/// One access check, as received from the login flow
#[derive(Debug, Clone)]
pub struct DeviceAccessRequest {
    pub user_id: Uuid,
    pub device_fingerprint: String,
    pub device_info: serde_json::Value,
    pub geolocation: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub locale: Option<Locale>,
}

/// Gate outcome returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccessDecision {
    pub allowed: bool,
    pub device: Option<UserDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// =============================================================================
// DEVICE ACCESS SERVICE
// =============================================================================

pub struct DeviceAccessService {
    store: Arc<dyn DeviceStore>,
    config: DevicePolicyConfig,
}

impl DeviceAccessService {
    pub fn new(store: Arc<dyn DeviceStore>, config: DevicePolicyConfig) -> Self {
        Self { store, config }
    }

    /// Evaluate the device policy for one login attempt.
    ///
    /// Order of checks:
    /// 1. quota lookup (profile value, else the configured default)
    /// 2. known active device: allow and count the login
    /// 3. known disabled device: deny
    /// 4. unknown device with no active devices: register it as primary
    /// 5. unknown device at or over quota: deny
    /// 6. any other unknown device: deny, only an administrator may add it
    ///
    /// Persistence failures are returned as errors, never as a decision.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn check_access(
        &self,
        request: DeviceAccessRequest,
    ) -> Result<AccessDecision, DeviceAccessError> {
        if !is_valid_fingerprint(&request.device_fingerprint) {
            return Err(DeviceAccessError::InvalidFingerprint);
        }

        let locale = request.locale.unwrap_or(self.config.default_locale);
        let quota = self
            .store
            .max_devices_allowed(request.user_id)
            .await?
            .map(i64::from)
            .unwrap_or(i64::from(self.config.default_max_devices));

        for attempt in 0..=self.config.registration_retries {
            let existing = self
                .store
                .find_device(request.user_id, &request.device_fingerprint)
                .await?;

            if let Some(device) = existing {
                if device.is_active {
                    let entry = self.log_entry(&request, Some(device.id), true, None);
                    let device = self.store.record_login(device.id, entry).await?;
                    info!(
                        "Known device {} allowed (login #{})",
                        device.id, device.login_count
                    );
                    self.audit(&request, Some(device.id), true, None);
                    return Ok(AccessDecision {
                        allowed: true,
                        device: Some(device),
                        reason: None,
                    });
                }

                return Ok(self
                    .deny(&request, Some(device.id), DeviceReason::DeviceDisabled, locale)
                    .await);
            }

            let active = self.store.count_active_devices(request.user_id).await?;

            if active == 0 {
                let new_device = NewUserDevice::primary(
                    request.user_id,
                    request.device_fingerprint.clone(),
                    Some(derive_device_name(&request)),
                    request.device_info.clone(),
                );

                let reason = DeviceReason::FirstDeviceRegistered;
                let entry = self.log_entry(&request, None, true, Some(reason));

                match self.store.register_first_device(new_device, entry).await? {
                    FirstDeviceOutcome::Registered(device) => {
                        info!("Registered first device {} as primary", device.id);
                        self.audit(&request, Some(device.id), true, Some(reason));
                        return Ok(AccessDecision {
                            allowed: true,
                            device: Some(device),
                            reason: Some(reason.text(locale)),
                        });
                    },
                    FirstDeviceOutcome::Conflict => {
                        warn!(
                            "First device registration raced (attempt {}), re-evaluating",
                            attempt + 1
                        );
                        continue;
                    },
                }
            }

            let reason = if active >= quota {
                DeviceReason::QuotaReached {
                    count: active,
                    quota,
                }
            } else {
                DeviceReason::NotAuthorized
            };

            return Ok(self.deny(&request, None, reason, locale).await);
        }

        error!(
            "Giving up on device registration after {} attempts",
            self.config.registration_retries + 1
        );
        Err(DeviceAccessError::RegistrationContention)
    }

    async fn deny(
        &self,
        request: &DeviceAccessRequest,
        device_id: Option<Uuid>,
        reason: DeviceReason,
        locale: Locale,
    ) -> AccessDecision {
        warn!("Device access denied: {}", reason.audit_text());
        self.audit(request, device_id, false, Some(reason));

        // A denial stands even when its audit row cannot be written
        let entry = self.log_entry(request, device_id, false, Some(reason));
        if let Err(e) = self.store.append_access_log(entry).await {
            error!(
                "Failed to write device access log for user {}: {}",
                request.user_id, e
            );
        }

        AccessDecision {
            allowed: false,
            device: None,
            reason: Some(reason.text(locale)),
        }
    }

    /// The single access-log row for this evaluation
    fn log_entry(
        &self,
        request: &DeviceAccessRequest,
        device_id: Option<Uuid>,
        allowed: bool,
        reason: Option<DeviceReason>,
    ) -> NewDeviceAccessLogEntry {
        NewDeviceAccessLogEntry {
            user_id: request.user_id,
            device_id,
            device_fingerprint: request.device_fingerprint.clone(),
            access_type: access_type(allowed).as_str().to_string(),
            was_allowed: allowed,
            reason: reason.map(|r| r.audit_text()),
            geolocation: request.geolocation.clone(),
            ip_address: request.ip_address.clone(),
            user_agent: request.user_agent.clone(),
            created_at: Utc::now(),
        }
    }

    fn audit(
        &self,
        request: &DeviceAccessRequest,
        device_id: Option<Uuid>,
        allowed: bool,
        reason: Option<DeviceReason>,
    ) {
        let reason_text = reason.map(|r| r.audit_text());
        AuditLogger::log_device_decision(
            access_type(allowed),
            request.user_id,
            device_id,
            &request.device_fingerprint,
            reason_text.as_deref(),
            request.ip_address.as_deref(),
        );
    }
}

fn access_type(allowed: bool) -> AccessType {
    if allowed {
        AccessType::LoginSuccess
    } else {
        AccessType::LoginBlocked
    }
}

/// Label for a newly registered device: prefer the client's signal bundle,
/// fall back to parsing the user agent
fn derive_device_name(request: &DeviceAccessRequest) -> String {
    if let Ok(bundle) = serde_json::from_value::<DeviceSignalBundle>(request.device_info.clone()) {
        if !bundle.browser.name.is_empty() {
            return bundle.device_name();
        }
    }

    let parsed = parse_user_agent(request.user_agent.as_deref().unwrap_or_default());
    format!(
        "{} {} on {} {}",
        parsed.browser_name, parsed.browser_version, parsed.os_name, parsed.os_version
    )
}
