//! Factory configuration.
//!
//! Pool sizing and timeout settings, read from environment variables with
//! defaults suitable for development.

use std::env;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the database factory.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Maximum number of connections per pool.
    pub max_connections: u32,
    /// Timeout in seconds when acquiring a connection.
    pub connect_timeout_secs: u64,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl FactoryConfig {
    /// Loads configuration from the environment.
    ///
    /// Reads `FACTORY_MAX_CONNECTIONS` and `FACTORY_CONNECT_TIMEOUT_SECS`,
    /// falling back to defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let max_connections = env::var("FACTORY_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let connect_timeout_secs = env::var("FACTORY_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Self {
            max_connections,
            connect_timeout_secs,
        }
    }
}
