//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// Signing key used when `JWT_SECRET` is not set. Kept for compatibility with
/// existing deployments; startup logs a warning whenever it is in effect.
pub const FALLBACK_JWT_SECRET: &str = "fallback_secret";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Deployment environment. Only `Production` changes behaviour (secure cookies).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub jwt_secret: String,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl Default for Config {
    /// Development settings with the in-memory store. Used by tests.
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 4000)),
            database_url: None,
            db_max_connections: 5,
            log_level: Level::INFO,
            jwt_secret: FALLBACK_JWT_SECRET.to_string(),
            environment: Environment::Development,
            cors_origins: default_cors_origins(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let db_max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            Err(_) => 5,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Security Settings ---
        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_JWT_SECRET.to_string());

        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            Ok("development") | Ok("test") | Err(_) => Environment::Development,
            Ok(other) => {
                return Err(ConfigError::InvalidValue(
                    "APP_ENV".to_string(),
                    format!("'{}' is not one of production, development, test", other),
                ))
            }
        };

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|_| default_cors_origins());

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            jwt_secret,
            environment,
            cors_origins,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn uses_fallback_secret(&self) -> bool {
        self.jwt_secret == FALLBACK_JWT_SECRET
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config {
            jwt_secret: "super-secret".to_string(),
            database_url: Some("postgres://user:pw@db/glucose".to_string()),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("pw@db"));
    }

    #[test]
    fn default_config_uses_fallback_secret() {
        let config = Config::default();
        assert!(config.uses_fallback_secret());
        assert!(!config.is_production());
    }
}
