use std::time::Duration;

use laurels_core::content::CacheConfig;

use crate::auth::jwt::JwtConfig;

/// A required variable is missing or a value does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Optional administrator created at startup when no admin exists yet.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long to wait for background services to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub content_cache_ttl_secs: u64,
    pub content_fetch_timeout_secs: u64,
    /// Upper bound for each independently fetched dashboard section.
    pub dashboard_section_timeout_secs: u64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `HOST`                           | `0.0.0.0`               |
    /// | `PORT`                           | `3000`                  |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`          | `30`                    |
    /// | `CONTENT_CACHE_TTL_SECS`         | `30`                    |
    /// | `CONTENT_FETCH_TIMEOUT_SECS`     | `30`                    |
    /// | `DASHBOARD_SECTION_TIMEOUT_SECS` | `5`                     |
    /// | `ADMIN_EMAIL`, `ADMIN_PASSWORD`  | unset                   |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port = parse_env("PORT", 3000u16, "u16")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let bootstrap_admin = match (
            std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30u64, "u64")?,
            shutdown_timeout_secs: parse_env("SHUTDOWN_TIMEOUT_SECS", 30u64, "u64")?,
            jwt: JwtConfig::from_env()?,
            content_cache_ttl_secs: parse_env("CONTENT_CACHE_TTL_SECS", 30u64, "u64")?,
            content_fetch_timeout_secs: parse_env("CONTENT_FETCH_TIMEOUT_SECS", 30u64, "u64")?,
            dashboard_section_timeout_secs: parse_env("DASHBOARD_SECTION_TIMEOUT_SECS", 5u64, "u64")?,
            bootstrap_admin,
        })
    }

    /// Content cache tuning derived from this configuration. Retry count and
    /// backoff step keep their defaults.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.content_cache_ttl_secs),
            fetch_timeout: Duration::from_secs(self.content_fetch_timeout_secs),
            ..CacheConfig::default()
        }
    }

    pub fn dashboard_section_timeout(&self) -> Duration {
        Duration::from_secs(self.dashboard_section_timeout_secs)
    }
}

pub(crate) fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

pub(crate) fn parse_env<T: std::str::FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
