//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INVENTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `INVENTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `INVENTORY_PORT` - Listen port (default: 8000)
//! - `INVENTORY_AUTH_HEADER` - Header carrying the authenticated account id
//!   (default: x-authenticated-account)
//! - `INVENTORY_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `INVENTORY_TLS_CERT` - PEM-encoded certificate chain
//! - `INVENTORY_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderName;
use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_AUTH_HEADER: &str = "x-authenticated-account";
const DEFAULT_PORT: &str = "8000";
const DEFAULT_MAX_CONNECTIONS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum pool connections
    pub max_connections: u32,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Header set by the upstream authentication layer
    pub auth_header: HeaderName,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_pair(cert_pem: Option<String>, key_pem: Option<String>) -> Result<Option<Self>, ConfigError> {
        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "INVENTORY_TLS_*".to_string(),
                "Both INVENTORY_TLS_CERT and INVENTORY_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("INVENTORY_DATABASE_URL")?;
        let max_connections = parse_env(
            "INVENTORY_DB_MAX_CONNECTIONS",
            &get_env_or_default("INVENTORY_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
        )?;
        let host = parse_env(
            "INVENTORY_HOST",
            &get_env_or_default("INVENTORY_HOST", "127.0.0.1"),
        )?;
        let port = parse_env("INVENTORY_PORT", &get_env_or_default("INVENTORY_PORT", DEFAULT_PORT))?;
        let auth_header = parse_auth_header(&get_env_or_default(
            "INVENTORY_AUTH_HEADER",
            DEFAULT_AUTH_HEADER,
        ))?;
        let log_format = parse_env("LOG_FORMAT", &get_env_or_default("LOG_FORMAT", "text"))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);
        let tls = TlsConfig::from_pair(
            get_optional_env("INVENTORY_TLS_CERT"),
            get_optional_env("INVENTORY_TLS_KEY"),
        )?;

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            auth_header,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_auth_header(raw: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(raw.trim().to_ascii_lowercase().as_bytes())
        .map_err(|e| ConfigError::InvalidEnvVar("INVENTORY_AUTH_HEADER".to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            max_connections: 10,
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            auth_header: HeaderName::from_static(DEFAULT_AUTH_HEADER),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
            tls: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_env_reports_key() {
        let err = parse_env::<u16>("INVENTORY_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "INVENTORY_PORT"));
    }

    #[test]
    fn test_auth_header_normalized() {
        let header = parse_auth_header(" X-Remote-User ").unwrap();
        assert_eq!(header.as_str(), "x-remote-user");
        assert!(parse_auth_header("bad header").is_err());
    }

    #[test]
    fn test_tls_requires_both_halves() {
        assert!(TlsConfig::from_pair(None, None).unwrap().is_none());
        assert!(TlsConfig::from_pair(Some("cert".into()), Some("key".into()))
            .unwrap()
            .is_some());
        assert!(TlsConfig::from_pair(Some("cert".into()), None).is_err());
        assert!(TlsConfig::from_pair(None, Some("key".into())).is_err());
    }

    #[test]
    fn test_tls_config_debug_redacts_key() {
        let tls = TlsConfig {
            cert_pem: "-----BEGIN CERTIFICATE-----".to_string(),
            key_pem: SecretString::from("super_secret_private_key"),
        };
        let debug_output = format!("{tls:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_key"));
    }

    #[test]
    fn test_config_debug_hides_database_password() {
        let mut cfg = config();
        cfg.database_url = SecretString::from("postgres://user:hunter2@db/inventory");
        let debug_output = format!("{cfg:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
