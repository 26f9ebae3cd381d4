use std::time::Duration;

/// Service configuration, read from the environment (and `.env` when present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite database file, or `:memory:` (`DATABASE_URL`)
    pub database_url: String,

    /// Maximum pooled connections (`DB_POOL_MAX_SIZE`)
    pub pool_max_size: u32,

    /// Seconds to wait for a pooled connection or a locked database
    /// (`DB_CONNECTION_TIMEOUT_SECS`)
    pub connection_timeout_secs: u64,

    /// Listen address (`BIND_ADDR`)
    pub bind_addr: String,

    /// Listen port (`PORT`)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_max_size: default_pool_size(),
            connection_timeout_secs: default_timeout(),
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Build from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            pool_max_size: lookup("DB_POOL_MAX_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pool_max_size),
            connection_timeout_secs: lookup("DB_CONNECTION_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.connection_timeout_secs),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// `host:port` to bind the listener to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn default_database_url() -> String {
    "orders.db".to_string()
}

fn default_pool_size() -> u32 {
    8
}

fn default_timeout() -> u64 {
    30
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
