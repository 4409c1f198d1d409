// src/common/config.rs
//! Process configuration
//!
//! Everything the service needs from the environment is read once, here, at
//! startup. Services receive the values through their constructors and never
//! consult the environment themselves.

use std::env;
use thiserror::Error;

pub use crate::services::credentials::MIN_KEY_LEN as MIN_ENCRYPTION_KEY_LEN;

/// Default validity window of login tokens
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where the middleware looks for the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransport {
    /// `Authorization: Bearer <token>`
    Header,
    /// First line of the request body
    Body,
}

impl std::str::FromStr for TokenTransport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "header" => Ok(TokenTransport::Header),
            "body" => Ok(TokenTransport::Body),
            other => Err(ConfigError::Invalid {
                name: "TOKEN_TRANSPORT",
                reason: format!("expected 'header' or 'body', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                reason: format!("expected 'sqlite' or 'memory', got '{}'", other),
            }),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub token_transport: TokenTransport,
    pub encryption_key: String,
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub reset_db: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("token_transport", &self.token_transport)
            .field("encryption_key", &"<redacted>")
            .field("storage_backend", &self.storage_backend)
            .field("database_url", &self.database_url)
            .field("reset_db", &self.reset_db)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(p) => p.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(v) => v.parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: "TOKEN_TTL_HOURS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        let token_transport = env::var("TOKEN_TRANSPORT")
            .unwrap_or_else(|_| "header".to_string())
            .parse()?;

        let encryption_key = env::var("ENCRYPTION_MASTER_KEY")
            .map_err(|_| ConfigError::Missing("ENCRYPTION_MASTER_KEY"))?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://drop_api.db".to_string());

        let reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

        let config = Self {
            port,
            cors_origins,
            jwt_secret,
            token_ttl_hours,
            token_transport,
            encryption_key,
            storage_backend,
            database_url,
            reset_db,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the services could not run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must not be empty".to_string(),
            });
        }

        if self.encryption_key.len() < MIN_ENCRYPTION_KEY_LEN {
            return Err(ConfigError::Invalid {
                name: "ENCRYPTION_MASTER_KEY",
                reason: format!("must be at least {} bytes", MIN_ENCRYPTION_KEY_LEN),
            });
        }

        if self.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_HOURS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            port: 8080,
            cors_origins: vec![],
            jwt_secret: "clipboard-jwt-secret".to_string(),
            token_ttl_hours: 24,
            token_transport: TokenTransport::Header,
            encryption_key: "my-secret-foobarbaz200030004000x".to_string(),
            storage_backend: StorageBackend::Memory,
            database_url: "sqlite::memory:".to_string(),
            reset_db: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_empty_jwt_secret_rejected() {
        let mut config = sample();
        config.jwt_secret = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "JWT_SECRET", .. })
        ));
    }

    #[test]
    fn test_short_encryption_key_rejected() {
        let mut config = sample();
        config.encryption_key = "too-short".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                name: "ENCRYPTION_MASTER_KEY",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = sample();
        config.token_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_transport_and_backend() {
        assert_eq!("Header".parse::<TokenTransport>(), Ok(TokenTransport::Header));
        assert_eq!(" body ".parse::<TokenTransport>(), Ok(TokenTransport::Body));
        assert!("cookie".parse::<TokenTransport>().is_err());

        assert_eq!("sqlite".parse::<StorageBackend>(), Ok(StorageBackend::Sqlite));
        assert_eq!("MEMORY".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("clipboard-jwt-secret"));
        assert!(!rendered.contains("foobarbaz"));
    }
}
