//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so the binary runs out of the box and containers can override
//! everything.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Maximum connections in the database pool
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                  | Default      |
    /// |---------------------------|--------------|
    /// | `KASIR_HTTP_PORT`         | `3000`       |
    /// | `KASIR_DATABASE_PATH`     | `kasir.db`   |
    /// | `KASIR_DB_MAX_CONNECTIONS`| `5`          |
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("KASIR_HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KASIR_HTTP_PORT".to_string()))?,

            database_path: env::var("KASIR_DATABASE_PATH")
                .unwrap_or_else(|_| "kasir.db".to_string()),

            db_max_connections: env::var("KASIR_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KASIR_DB_MAX_CONNECTIONS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}
