//! HTTP server configuration object.

use std::net::SocketAddr;

use signup::domain::SessionCookieSettings;
use signup::outbound::persistence::DbPool;
use signup::settings::ServerTimeouts;

/// Everything `create_server` needs to wire the application.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) cookie_settings: SessionCookieSettings,
    pub(crate) timeouts: ServerTimeouts,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        cookie_settings: SessionCookieSettings,
        timeouts: ServerTimeouts,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            cookie_settings,
            timeouts,
        }
    }
}
