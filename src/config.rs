//! Environment-driven configuration, loaded once at startup.

use crate::error::ConfigError;
use std::net::SocketAddr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl AppConfig {
    /// Read configuration from the environment. `DATABASE_URL` falls back
    /// to a local server; `BIND_ADDR` and `PG_MAX_CONNECTIONS` have service
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/registrar".into());
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".into())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                message: format!("{}", e),
            })?;
        let max_connections = std::env::var("PG_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                key: "PG_MAX_CONNECTIONS",
                message: format!("{}", e),
            })?;
        Ok(AppConfig {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}
