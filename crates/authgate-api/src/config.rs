//! # Process Configuration
//!
//! Loaded once at startup from the environment. The signing secret is
//! required — the process refuses to start without it — and is wrapped in
//! [`SecretString`] so it never reaches log output.

use authgate_core::SecretString;
use chrono::Duration;
use thiserror::Error;

/// Environment variable holding the token signing secret. Required.
pub const ENV_JWT_SECRET: &str = "AUTHGATE_JWT_SECRET";
/// Environment variable holding the token TTL in seconds. Optional.
pub const ENV_TOKEN_TTL_SECS: &str = "AUTHGATE_TOKEN_TTL_SECS";
/// Environment variable holding the bind port. Optional.
pub const ENV_PORT: &str = "PORT";

const DEFAULT_TTL_SECS: i64 = 3600;
const DEFAULT_PORT: u16 = 8080;

/// Configuration could not be assembled. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The signing secret is absent or empty.
    #[error("{ENV_JWT_SECRET} must be set to a non-empty secret")]
    MissingSecret,
    /// The TTL is not a positive integer number of seconds.
    #[error("{ENV_TOKEN_TTL_SECS} must be a positive integer, got {0:?}")]
    InvalidTtl(String),
    /// The port is not a valid TCP port number.
    #[error("{ENV_PORT} must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

/// Process-wide configuration.
///
/// `SecretString` redacts the secret in the derived `Debug` output.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Token signing secret, immutable for the process lifetime.
    pub jwt_secret: SecretString,
    /// Validity duration of issued tokens.
    pub token_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the secret is absent/empty or either
    /// optional value fails to parse. Callers should exit on error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(ENV_JWT_SECRET).ok(),
            std::env::var(ENV_TOKEN_TTL_SECS).ok(),
            std::env::var(ENV_PORT).ok(),
        )
    }

    /// Assemble configuration from raw values. Split from [`Self::from_env`]
    /// so parsing is testable without mutating the process environment.
    fn from_values(
        secret: Option<String>,
        ttl_secs: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = match secret {
            Some(s) if !s.is_empty() => SecretString::new(s),
            _ => return Err(ConfigError::MissingSecret),
        };

        let token_ttl = match ttl_secs {
            None => Duration::seconds(DEFAULT_TTL_SECS),
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => Duration::seconds(secs),
                _ => return Err(ConfigError::InvalidTtl(raw)),
            },
        };

        let port = match port {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
        };

        Ok(Self {
            port,
            jwt_secret,
            token_ttl,
        })
    }

    /// Minimal configuration for tests: given secret, one-hour TTL.
    #[cfg(test)]
    pub(crate) fn for_tests(secret: &str) -> Self {
        Self {
            port: 0,
            jwt_secret: SecretString::new(secret),
            token_ttl: Duration::hours(1),
        }
    }
}
