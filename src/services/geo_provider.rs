// IP geolocation lookup
// Default provider speaks the ipapi.co JSON format

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum GeoLookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Provider rejected lookup: {0}")]
    Provider(String),

    #[error("Lookup timed out")]
    Timeout,
}

// =============================================================================
// DATA STRUCTURES
// =============================================================================

/// Resolved location of an IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    pub country: Option<String>,
    #[serde(skip_serializing)]
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Raw provider payload; success and error share one shape
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    country_code: Option<String>,
    country_name: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn lookup(&self, ip: &str) -> Result<GeoLocation, GeoLookupError>;
}

// =============================================================================
// IPAPI PROVIDER
// =============================================================================

pub struct IpApiProvider {
    base_url: String,
    http_client: reqwest::Client,
}

impl IpApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("device-access-core/0.1")
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn lookup_url(&self, ip: &str) -> String {
        format!("{}/{}/json/", self.base_url, ip)
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    async fn lookup(&self, ip: &str) -> Result<GeoLocation, GeoLookupError> {
        let response = self
            .http_client
            .get(self.lookup_url(ip))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeoLookupError::Timeout
                } else {
                    GeoLookupError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoLookupError::Status(status.as_u16()));
        }

        let payload: IpApiResponse = response.json().await?;
        debug!("Geolocation for {}: {:?}", ip, payload.country_code);

        if payload.error {
            return Err(GeoLookupError::Provider(
                payload.reason.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(GeoLocation {
            country: payload.country_name,
            country_code: payload.country_code,
            city: payload.city,
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url() {
        let provider = IpApiProvider::new("https://ipapi.co/", Duration::from_secs(3));
        assert_eq!(
            provider.lookup_url("81.22.16.4"),
            "https://ipapi.co/81.22.16.4/json/"
        );
    }

    #[test]
    fn test_error_payload_shape() {
        let payload: IpApiResponse =
            serde_json::from_str(r#"{"ip":"8.8.8.8","error":true,"reason":"RateLimited"}"#)
                .expect("error payload parses");
        assert!(payload.error);
        assert_eq!(payload.reason.as_deref(), Some("RateLimited"));
    }

    #[test]
    fn test_location_serializes_without_code() {
        let location = GeoLocation {
            country: Some("Palestine".to_string()),
            country_code: Some("PS".to_string()),
            city: Some("Ramallah".to_string()),
            latitude: Some(31.9),
            longitude: Some(35.2),
        };

        let json = serde_json::to_value(&location).expect("serializes");
        assert_eq!(json["country"], "Palestine");
        assert!(json.get("country_code").is_none());
    }
}
