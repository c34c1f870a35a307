// Login location verification
// IP geofence that fails open: only a confirmed out-of-region lookup blocks.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::http::HeaderMap;
use ipnetwork::Ipv6Network;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    app_config::LocationPolicyConfig,
    models::{NewNotification, NewSuspiciousLoginAttempt, REVIEW_PENDING, SEVERITY_HIGH},
    services::{
        geo_provider::{GeoLocation, GeoLookupError, GeoProvider},
        login_security_store::LoginSecurityStore,
        messages,
    },
    utils::audit_logger::AuditLogger,
};

pub const UNKNOWN_IP: &str = "unknown";

static UNIQUE_LOCAL_V6: Lazy<Option<Ipv6Network>> = Lazy::new(|| "fc00::/7".parse().ok());
static LINK_LOCAL_V6: Lazy<Option<Ipv6Network>> = Lazy::new(|| "fe80::/10".parse().ok());

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationVerification {
    pub allowed: bool,
    pub blocked: bool,
    pub location: Option<GeoLocation>,
    pub message: String,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

impl LocationVerification {
    fn allow(ip: String, message: &str) -> Self {
        Self {
            allowed: true,
            blocked: false,
            location: None,
            message: message.to_string(),
            ip,
            country_code: None,
            country_name: None,
        }
    }
}

// =============================================================================
// IP HELPERS
// =============================================================================

/// Client IP from proxy headers: first `x-forwarded-for` hop, then
/// `cf-connecting-ip`, then `x-real-ip`
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    header("cf-connecting-ip")
        .or_else(|| header("x-real-ip"))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// Parse a client address as proxies report it: bare, `ip:port`,
/// `[v6]` or `[v6]:port`
pub fn parse_client_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .or_else(|_| raw.parse::<SocketAddr>().map(|addr| addr.ip()))
        .ok()
        .or_else(|| raw.strip_prefix('[')?.strip_suffix(']')?.parse().ok())
}

/// Addresses that never leave the local network, plus anything unparseable
pub fn is_private_or_local(ip: &str) -> bool {
    parse_client_ip(ip).map_or(true, is_local_addr)
}

fn is_local_addr(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        },
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_local_addr(IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || UNIQUE_LOCAL_V6
                    .as_ref()
                    .map_or(false, |net| net.contains(v6))
                || LINK_LOCAL_V6.as_ref().map_or(false, |net| net.contains(v6))
        },
    }
}

/// Exact code match or substring name match, both case-insensitive
pub fn country_allowed(location: &GeoLocation, policy: &LocationPolicyConfig) -> bool {
    let code_match = location.country_code.as_deref().map_or(false, |code| {
        policy
            .allowed_country_codes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(code.trim()))
    });

    let name_match = location.country.as_deref().map_or(false, |name| {
        let name = name.to_lowercase();
        policy
            .allowed_country_names
            .iter()
            .any(|allowed| name.contains(&allowed.to_lowercase()))
    });

    code_match || name_match
}

// =============================================================================
// LOCATION VERIFICATION SERVICE
// =============================================================================

pub struct LocationVerificationService {
    geo: Arc<dyn GeoProvider>,
    store: Arc<dyn LoginSecurityStore>,
    policy: LocationPolicyConfig,
}

impl LocationVerificationService {
    pub fn new(
        geo: Arc<dyn GeoProvider>,
        store: Arc<dyn LoginSecurityStore>,
        policy: LocationPolicyConfig,
    ) -> Self {
        Self { geo, store, policy }
    }

    /// Decide whether a login from `ip` may proceed. Never fails.
    #[instrument(skip(self, email, user_agent))]
    pub async fn verify(
        &self,
        email: &str,
        ip: String,
        user_agent: Option<String>,
    ) -> LocationVerification {
        if is_private_or_local(&ip) {
            info!("Skipping geolocation for local address");
            return LocationVerification::allow(ip, messages::LOCAL_NETWORK_MESSAGE);
        }
        let ip = parse_client_ip(&ip).map_or(ip, |addr| addr.to_string());

        let location = match self.lookup(&ip).await {
            Ok(location) => location,
            Err(e) => {
                warn!("Geolocation lookup failed, allowing login: {}", e);
                return LocationVerification::allow(ip, messages::VERIFICATION_SKIPPED_MESSAGE);
            },
        };

        let allowed = country_allowed(&location, &self.policy);
        let country_code = location.country_code.clone();
        let country_name = location.country.clone();

        if allowed {
            info!("Login location allowed: {:?}", country_code);
        } else {
            warn!(
                "Login blocked from {:?} ({:?})",
                country_name, country_code
            );
            self.record_block(email, &ip, &location, user_agent).await;
        }

        LocationVerification {
            allowed,
            blocked: !allowed,
            location: Some(location),
            message: if allowed {
                messages::LOCATION_ALLOWED_MESSAGE.to_string()
            } else {
                messages::LOCATION_BLOCKED_MESSAGE.to_string()
            },
            ip,
            country_code,
            country_name,
        }
    }

    async fn lookup(&self, ip: &str) -> Result<GeoLocation, GeoLookupError> {
        tokio::time::timeout(self.policy.lookup_timeout(), self.geo.lookup(ip))
            .await
            .map_err(|_| GeoLookupError::Timeout)?
    }

    /// Persist the attempt and alert reviewers. Every step is best-effort.
    async fn record_block(
        &self,
        email: &str,
        ip: &str,
        location: &GeoLocation,
        user_agent: Option<String>,
    ) {
        let user_id = match self.store.find_user_id_by_email(email).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to resolve user for blocked login: {}", e);
                None
            },
        };

        AuditLogger::log_location_block(user_id, email, ip, location.country_code.as_deref());

        let attempt = NewSuspiciousLoginAttempt {
            user_id,
            email: email.to_string(),
            ip_address: ip.to_string(),
            country: location.country.clone(),
            country_code: location.country_code.clone(),
            city: location.city.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            user_agent,
            blocked: true,
            severity: SEVERITY_HIGH.to_string(),
            status: REVIEW_PENDING.to_string(),
        };

        if let Err(e) = self.store.record_suspicious_attempt(attempt).await {
            error!("Failed to record suspicious login attempt: {}", e);
        }

        let country = location
            .country
            .clone()
            .unwrap_or_else(|| "unknown country".to_string());
        self.notify(user_id, email, ip, &country).await;
    }

    async fn notify(&self, user_id: Option<Uuid>, email: &str, ip: &str, country: &str) {
        let reviewers = match self.store.find_users_with_roles(&self.policy.elevated_roles).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to load security reviewers: {}", e);
                Vec::new()
            },
        };

        // Separate batches so a reviewer failure cannot drop the account alert
        let body = messages::security_alert_body(email, ip, country);
        let reviewer_alerts: Vec<NewNotification> = reviewers
            .into_iter()
            .map(|reviewer| {
                NewNotification::security_alert(
                    reviewer,
                    messages::SECURITY_ALERT_TITLE.to_string(),
                    body.clone(),
                )
            })
            .collect();

        match self.store.create_notifications(reviewer_alerts).await {
            Ok(count) => info!("Sent {} reviewer security alerts", count),
            Err(e) => error!("Failed to send reviewer security alerts: {}", e),
        }

        if let Some(user_id) = user_id {
            let alert = NewNotification::security_alert(
                user_id,
                messages::ACCOUNT_ALERT_TITLE.to_string(),
                messages::account_alert_body(ip, country),
            );
            if let Err(e) = self.store.create_notifications(vec![alert]).await {
                error!("Failed to send account security alert to {}: {}", user_id, e);
            }
        }
    }
}
