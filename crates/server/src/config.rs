//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - Access-token signing secret (min 32 chars, not a placeholder)
//! - `CATALOG_API_URL` - Base URL of the upstream catalog API
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `JWT_ACCESS_TTL_SECS` - Access-token lifetime (default: 900)
//! - `CATALOG_OAUTH_CONSUMER_KEY` / `CATALOG_OAUTH_TOKEN` /
//!   `CATALOG_OAUTH_SIGNATURE_METHOD` / `CATALOG_OAUTH_SIGNATURE` -
//!   static query-string credentials forwarded to the upstream catalog

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Access tokens are short-lived credentials; cap the lifetime at 30 days.
const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Access-token signing secret
    pub jwt_secret: SecretString,
    /// Access-token lifetime in seconds (validated positive, capped)
    pub access_token_ttl_secs: i64,
    /// Upstream catalog API configuration
    pub catalog: CatalogApiConfig,
}

/// Upstream catalog API configuration.
///
/// Implements `Debug` manually to redact the credential fields.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// Static query-string credentials appended to every request
    pub oauth_params: Vec<(String, SecretString)>,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url)
            .field("oauth_params", &format!("[{} redacted]", self.oauth_params.len()))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the JWT secret fails placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_required_secret("DATABASE_URL")?;
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let jwt_secret = get_required_secret("JWT_SECRET")?;
        validate_signing_secret(&jwt_secret, "JWT_SECRET")?;

        let access_token_ttl_secs = get_env_or_default("JWT_ACCESS_TTL_SECS", "900")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JWT_ACCESS_TTL_SECS".to_string(), e.to_string())
            })?;
        validate_access_ttl(access_token_ttl_secs)?;

        let catalog = CatalogApiConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            access_token_ttl_secs,
            catalog,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CATALOG_API_URL")?;

        let mut oauth_params = Vec::new();
        for (var, param) in [
            ("CATALOG_OAUTH_CONSUMER_KEY", "oauth_consumer_key"),
            ("CATALOG_OAUTH_TOKEN", "oauth_token"),
            ("CATALOG_OAUTH_SIGNATURE_METHOD", "oauth_signature_method"),
            ("CATALOG_OAUTH_SIGNATURE", "oauth_signature"),
        ] {
            if let Some(value) = get_optional_env(var) {
                oauth_params.push((param.to_string(), SecretString::from(value)));
            }
        }

        Ok(Self {
            base_url,
            oauth_params,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that an access-token TTL is positive and within the cap.
fn validate_access_ttl(ttl_secs: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_ACCESS_TOKEN_TTL_SECS).contains(&ttl_secs) {
        return Err(ConfigError::InvalidEnvVar(
            "JWT_ACCESS_TTL_SECS".to_string(),
            format!("must be between 1 and {MAX_ACCESS_TOKEN_TTL_SECS} seconds (got {ttl_secs})"),
        ));
    }
    Ok(())
}

/// Validate that a signing secret is long enough and not a placeholder.
fn validate_signing_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn signing_secret_too_short_is_rejected() {
        let secret = SecretString::from("short");
        assert!(validate_signing_secret(&secret, "TEST").is_err());
    }

    #[test]
    fn signing_secret_placeholder_is_rejected() {
        let secret = SecretString::from("changeme-changeme-changeme-changeme");
        let err = validate_signing_secret(&secret, "TEST").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn signing_secret_random_is_accepted() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%dF8(");
        assert!(validate_signing_secret(&secret, "TEST").is_ok());
    }

    #[test]
    fn access_ttl_out_of_range_is_rejected() {
        assert!(validate_access_ttl(0).is_err());
        assert!(validate_access_ttl(-900).is_err());
        assert!(validate_access_ttl(MAX_ACCESS_TOKEN_TTL_SECS + 1).is_err());
        assert!(validate_access_ttl(900).is_ok());
        assert!(validate_access_ttl(MAX_ACCESS_TOKEN_TTL_SECS).is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from("x".repeat(32)),
            access_token_ttl_secs: 900,
            catalog: CatalogApiConfig {
                base_url: "https://catalog.example.test/api".to_string(),
                oauth_params: Vec::new(),
            },
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn catalog_config_debug_redacts_credentials() {
        let config = CatalogApiConfig {
            base_url: "https://catalog.example.test/api".to_string(),
            oauth_params: vec![(
                "oauth_token".to_string(),
                SecretString::from("super_secret_token"),
            )],
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("catalog.example.test"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
