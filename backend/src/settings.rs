//! Application settings loaded via OrthoConfig.
//!
//! Values come from `SIGNUP_*` environment variables, configuration files and
//! command-line flags, merged by `ortho_config`. Session cookie toggles are
//! handled separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 25;
const DEFAULT_POOL_MIN_IDLE: u32 = 5;
const DEFAULT_POOL_MAX_LIFETIME_SECS: u64 = 60 * 60;
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 30 * 60;
const DEFAULT_SERVER_READ_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SERVER_WRITE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SERVER_IDLE_TIMEOUT_SECS: u64 = 60;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("SIGNUP_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Server and persistence settings.
///
/// Every field is optional; accessors apply the defaults. Pool lifetimes of
/// zero disable the corresponding limit.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SIGNUP")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Connections the pool keeps open while idle.
    pub pool_min_idle: Option<u32>,
    /// Seconds before a pooled connection is recycled.
    pub pool_max_lifetime_secs: Option<u64>,
    /// Seconds an idle pooled connection is kept.
    pub pool_idle_timeout_secs: Option<u64>,
    /// Apply pending schema migrations before serving traffic.
    pub run_migrations: Option<bool>,
    /// Seconds allowed for a client to send the request head.
    pub server_read_timeout_secs: Option<u64>,
    /// Seconds allowed to finish writing and closing a connection.
    pub server_write_timeout_secs: Option<u64>,
    /// Seconds an idle keep-alive connection stays open.
    pub server_idle_timeout_secs: Option<u64>,
}

/// Connection timeouts applied to the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    /// Deadline for receiving the request head.
    pub read: Duration,
    /// Deadline for shutting a connection down once the response is written.
    pub write: Duration,
    /// Keep-alive window between requests.
    pub idle: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(DEFAULT_SERVER_READ_TIMEOUT_SECS),
            write: Duration::from_secs(DEFAULT_SERVER_WRITE_TIMEOUT_SECS),
            idle: Duration::from_secs(DEFAULT_SERVER_IDLE_TIMEOUT_SECS),
        }
    }
}

fn optional_secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

impl AppSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL was supplied.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Whether to migrate on start-up. Defaults to `true`.
    #[must_use]
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Pool configuration derived from these settings.
    ///
    /// `pool_min_idle` is clamped to `pool_max_size`.
    ///
    /// # Errors
    ///
    /// Fails when the database URL is missing or the pool size is zero.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        if max_size == 0 {
            return Err(SettingsError::EmptyPool);
        }
        let min_idle = self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE);
        let max_lifetime = self
            .pool_max_lifetime_secs
            .unwrap_or(DEFAULT_POOL_MAX_LIFETIME_SECS);
        let idle_timeout = self
            .pool_idle_timeout_secs
            .unwrap_or(DEFAULT_POOL_IDLE_TIMEOUT_SECS);

        Ok(PoolConfig::new(self.database_url()?)
            .with_min_idle(Some(min_idle))
            .with_max_size(max_size)
            .with_max_lifetime(optional_secs(max_lifetime))
            .with_idle_timeout(optional_secs(idle_timeout)))
    }

    /// HTTP server timeouts, defaulting to 15s read, 15s write and 60s idle.
    #[must_use]
    pub fn server_timeouts(&self) -> ServerTimeouts {
        let defaults = ServerTimeouts::default();
        ServerTimeouts {
            read: self
                .server_read_timeout_secs
                .map_or(defaults.read, Duration::from_secs),
            write: self
                .server_write_timeout_secs
                .map_or(defaults.write, Duration::from_secs),
            idle: self
                .server_idle_timeout_secs
                .map_or(defaults.idle, Duration::from_secs),
        }
    }
}
