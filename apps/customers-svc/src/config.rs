//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Customers service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvcConfig {
    /// NATS server URL
    pub nats_url: String,

    /// Queue group shared by all instances of this service, so a pattern
    /// is handled by exactly one instance
    pub queue_group: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,
}

impl SvcConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = SvcConfig {
            nats_url: env::var("NATS_URL")
                .unwrap_or_else(|_| "nats://localhost:4222".to_string()),

            queue_group: env::var("QUEUE_GROUP").unwrap_or_else(|_| "customers".to_string()),

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./mesa.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_is_empty() {
        // The variables are not set in the test environment
        let config = SvcConfig::load().unwrap();
        assert_eq!(config.queue_group, "customers");
        assert_eq!(config.db_max_connections, 5);
    }
}
