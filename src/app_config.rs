// Centralized configuration management for the device access service
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::services::messages::Locale;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // Security
    pub cors_allowed_origins: Vec<String>,

    // Features
    pub enable_swagger_ui: bool,
    pub disable_embedded_migrations: bool,

    // Nested configs
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub device_policy: DevicePolicyConfig,
    pub location_policy: LocationPolicyConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

/// Device gate settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DevicePolicyConfig {
    /// Quota applied when a profile has no `max_devices_allowed`
    pub default_max_devices: u32,
    /// Language of denial reasons when the caller does not ask for one
    pub default_locale: Locale,
    /// How many times a lost first-device race is re-evaluated
    pub registration_retries: u32,
}

impl Default for DevicePolicyConfig {
    fn default() -> Self {
        Self {
            default_max_devices: 1,
            default_locale: Locale::Ar,
            registration_retries: 3,
        }
    }
}

/// Login geofence settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationPolicyConfig {
    pub geo_provider_url: String,
    pub geo_lookup_timeout_ms: u64,
    /// ISO country codes, compared case-insensitively
    pub allowed_country_codes: Vec<String>,
    /// Accepted country name spellings, matched as lowercase substrings
    pub allowed_country_names: Vec<String>,
    /// Roles that receive security alerts for blocked logins
    pub elevated_roles: Vec<String>,
}

impl LocationPolicyConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.geo_lookup_timeout_ms)
    }
}

impl Default for LocationPolicyConfig {
    fn default() -> Self {
        Self {
            geo_provider_url: "https://ipapi.co".to_string(),
            geo_lookup_timeout_ms: 3000,
            allowed_country_codes: vec!["PS".to_string()],
            allowed_country_names: vec![
                "palestine".to_string(),
                "palestinian territory".to_string(),
                "فلسطين".to_string(),
            ],
            elevated_roles: vec!["admin".to_string(), "super_admin".to_string()],
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get required env var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to parse env var with default
        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let environment_str = get_or_default("ENVIRONMENT", "development");
        let environment = Environment::from(environment_str);

        let database_url = get_required("DATABASE_URL")?;
        let database_max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", "20")?;
        let database_min_connections = parse_or_default("DATABASE_MIN_CONNECTIONS", "2")?;
        let database_connect_timeout = parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?;
        let database_idle_timeout = parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?;
        let database_max_lifetime = parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?;

        if database_max_connections < database_min_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS".to_string(),
                "must be >= DATABASE_MIN_CONNECTIONS".to_string(),
            ));
        }

        let cors_allowed_origins = split_list(&get_or_default("CORS_ALLOWED_ORIGINS", "*"));

        let enable_swagger_ui = parse_bool_or_default("ENABLE_SWAGGER_UI", "false");
        let disable_embedded_migrations =
            parse_bool_or_default("DISABLE_EMBEDDED_MIGRATIONS", "false");

        let rust_log = get_or_default("RUST_LOG", "info");

        // Device policy
        let default_max_devices = parse_or_default("DEFAULT_MAX_DEVICES", "1")?;
        if default_max_devices == 0 {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_MAX_DEVICES".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let locale_raw = get_or_default("DEFAULT_LOCALE", "ar");
        let default_locale = Locale::parse(&locale_raw).ok_or_else(|| {
            ConfigError::InvalidValue(
                "DEFAULT_LOCALE".to_string(),
                format!("unsupported locale '{}'", locale_raw),
            )
        })?;
        let registration_retries = parse_or_default("DEVICE_REGISTRATION_RETRIES", "3")?;

        // Location policy
        let location_defaults = LocationPolicyConfig::default();
        let geo_provider_url = get_or_default("GEO_PROVIDER_URL", &location_defaults.geo_provider_url);
        if url::Url::parse(&geo_provider_url).is_err() {
            return Err(ConfigError::InvalidValue(
                "GEO_PROVIDER_URL".to_string(),
                "not a valid URL".to_string(),
            ));
        }
        let geo_lookup_timeout_ms = parse_u64_or_default("GEO_LOOKUP_TIMEOUT_MS", "3000")?;
        if geo_lookup_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "GEO_LOOKUP_TIMEOUT_MS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let allowed_country_codes = env::var("ALLOWED_COUNTRY_CODES")
            .map(|raw| split_list(&raw))
            .unwrap_or(location_defaults.allowed_country_codes);
        let allowed_country_names = env::var("ALLOWED_COUNTRY_NAMES")
            .map(|raw| split_list(&raw))
            .unwrap_or(location_defaults.allowed_country_names);
        let elevated_roles = env::var("ELEVATED_ROLES")
            .map(|raw| split_list(&raw))
            .unwrap_or(location_defaults.elevated_roles);

        let server = ServerConfig {
            bind_address: bind_address.clone(),
            port,
            environment: environment.clone(),
            rust_log: rust_log.clone(),
        };

        let database = DatabaseConfig {
            url: database_url.clone(),
            max_connections: database_max_connections,
            min_connections: database_min_connections,
            connect_timeout: database_connect_timeout,
            idle_timeout: database_idle_timeout,
            max_lifetime: database_max_lifetime,
        };

        let device_policy = DevicePolicyConfig {
            default_max_devices,
            default_locale,
            registration_retries,
        };

        let location_policy = LocationPolicyConfig {
            geo_provider_url,
            geo_lookup_timeout_ms,
            allowed_country_codes,
            allowed_country_names,
            elevated_roles,
        };

        Ok(Self {
            bind_address,
            port,
            environment,
            rust_log,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout,
            database_idle_timeout,
            database_max_lifetime,
            cors_allowed_origins,
            enable_swagger_ui,
            disable_embedded_migrations,
            server,
            database,
            device_policy,
            location_policy,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Get the global configuration instance
/// This is the primary way to access configuration throughout the app
pub fn config() -> &'static AppConfig {
    &CONFIG
}
