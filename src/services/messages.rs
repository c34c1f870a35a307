// User-facing texts for access decisions
// Audit rows always store the English text; responses use the caller's locale.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// Accepts bare codes and region tags such as `ar-PS`
    pub fn parse(s: &str) -> Option<Self> {
        let primary = s.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_lowercase().as_str() {
            "ar" => Some(Locale::Ar),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

/// Why the device gate allowed or refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceReason {
    FirstDeviceRegistered,
    DeviceDisabled,
    QuotaReached { count: i64, quota: i64 },
    NotAuthorized,
}

impl DeviceReason {
    /// Stable English text stored in the access log
    pub fn audit_text(&self) -> String {
        self.text(Locale::En)
    }

    pub fn text(&self, locale: Locale) -> String {
        match (self, locale) {
            (DeviceReason::FirstDeviceRegistered, Locale::En) => {
                "First device registered".to_string()
            },
            (DeviceReason::FirstDeviceRegistered, Locale::Ar) => {
                "تم تسجيل الجهاز الأول".to_string()
            },
            (DeviceReason::DeviceDisabled, Locale::En) => {
                "This device has been disabled by administration. Contact an administrator"
                    .to_string()
            },
            (DeviceReason::DeviceDisabled, Locale::Ar) => {
                "تم تعطيل هذا الجهاز من قبل الإدارة. يرجى التواصل مع المسؤول".to_string()
            },
            (DeviceReason::QuotaReached { count, quota }, Locale::En) => format!(
                "Maximum device count reached ({}/{}). This device is not authorized; remove an old device or contact an administrator",
                count, quota
            ),
            (DeviceReason::QuotaReached { count, quota }, Locale::Ar) => format!(
                "تم الوصول إلى الحد الأقصى لعدد الأجهزة ({}/{}). هذا الجهاز غير مصرح له؛ قم بإزالة جهاز قديم أو تواصل مع المسؤول",
                count, quota
            ),
            (DeviceReason::NotAuthorized, Locale::En) => {
                "This device is not authorized; contact an administrator to register it"
                    .to_string()
            },
            (DeviceReason::NotAuthorized, Locale::Ar) => {
                "هذا الجهاز غير مصرح له؛ تواصل مع المسؤول لتسجيله".to_string()
            },
        }
    }
}

pub const LOCAL_NETWORK_MESSAGE: &str = "Local network login, location verification not required";
pub const VERIFICATION_SKIPPED_MESSAGE: &str =
    "Location verification skipped: geolocation service unavailable";
pub const LOCATION_ALLOWED_MESSAGE: &str = "Login location verified";
pub const LOCATION_BLOCKED_MESSAGE: &str =
    "Login blocked: access is geographically restricted. Contact an administrator";

pub const SECURITY_ALERT_TITLE: &str = "Suspicious login attempt blocked";
pub const ACCOUNT_ALERT_TITLE: &str = "Login attempt from outside the allowed region";

pub fn security_alert_body(email: &str, ip: &str, country: &str) -> String {
    format!(
        "A login attempt for {} from {} ({}) was blocked",
        email, ip, country
    )
}

pub fn account_alert_body(ip: &str, country: &str) -> String {
    format!(
        "A login to your account from {} ({}) was blocked. If this was not you, contact an administrator",
        ip, country
    )
}
