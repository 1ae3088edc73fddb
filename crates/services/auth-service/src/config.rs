//! Auth service configuration.

use std::env;

use thiserror::Error;

use common::{DatabaseConfig, JwtConfig, ServiceConfig};
use domain::{
    DEFAULT_ACCESS_EXPIRATION_HOURS, DEFAULT_REFRESH_EXPIRATION_HOURS, DEFAULT_TOKEN_ISSUER,
    MAX_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};

/// Configuration problems detected at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be at least {min} characters long")]
    SecretTooShort { name: &'static str, min: usize },

    #[error("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,

    #[error("{name} must be between 1 and {} hours, got {value:?}", MAX_EXPIRATION_HOURS)]
    InvalidExpiration { name: &'static str, value: String },
}

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            host: env::var("AUTH_SERVICE_HOST").unwrap_or(defaults.host),
            port: env::var("AUTH_SERVICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            ..defaults
        };

        let database = DatabaseConfig {
            url: env::var("AUTH_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or_else(|_| DatabaseConfig::default().url),
            ..DatabaseConfig::default()
        };

        let jwt = JwtConfig {
            access_secret: env::var("JWT_ACCESS_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_ACCESS_SECRET"))?,
            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_REFRESH_SECRET"))?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_TOKEN_ISSUER.to_string()),
            access_expiration_hours: hours_from_env(
                "JWT_ACCESS_EXPIRATION_HOURS",
                DEFAULT_ACCESS_EXPIRATION_HOURS,
            )?,
            refresh_expiration_hours: hours_from_env(
                "JWT_REFRESH_EXPIRATION_HOURS",
                DEFAULT_REFRESH_EXPIRATION_HOURS,
            )?,
        };

        let config = Self {
            service,
            database,
            jwt,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the signing configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_jwt(&self.jwt)
    }
}

/// Both secrets long enough, never the same value, and both lifetimes
/// within `1..=MAX_EXPIRATION_HOURS`.
pub fn validate_jwt(jwt: &JwtConfig) -> Result<(), ConfigError> {
    if jwt.access_secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::SecretTooShort {
            name: "JWT_ACCESS_SECRET",
            min: MIN_JWT_SECRET_LENGTH,
        });
    }
    if jwt.refresh_secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::SecretTooShort {
            name: "JWT_REFRESH_SECRET",
            min: MIN_JWT_SECRET_LENGTH,
        });
    }
    if jwt.access_secret == jwt.refresh_secret {
        return Err(ConfigError::SharedSecret);
    }
    for (name, hours) in [
        ("JWT_ACCESS_EXPIRATION_HOURS", jwt.access_expiration_hours),
        ("JWT_REFRESH_EXPIRATION_HOURS", jwt.refresh_expiration_hours),
    ] {
        if !valid_hours(hours) {
            return Err(ConfigError::InvalidExpiration {
                name,
                value: hours.to_string(),
            });
        }
    }
    Ok(())
}

fn valid_hours(hours: i64) -> bool {
    (1..=MAX_EXPIRATION_HOURS).contains(&hours)
}

fn hours_from_env(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|h| valid_hours(*h))
            .ok_or(ConfigError::InvalidExpiration { name, value }),
        Err(_) => Ok(default),
    }
}
