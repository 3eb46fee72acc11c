//! Sign-up service entry-point: loads configuration, applies migrations and
//! serves the HTTP API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use signup::inbound::http::health::HealthState;
use signup::inbound::http::session_config::{BuildMode, session_cookie_settings_from_env};
use signup::outbound::persistence::{DbPool, run_pending_migrations};
use signup::settings::AppSettings;

use server::{ServerConfig, create_server};

async fn apply_migrations(database_url: String) -> io::Result<()> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let cookie_settings =
        session_cookie_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let pool_config = settings.pool_config().map_err(io::Error::other)?;

    if settings.run_migrations() {
        apply_migrations(pool_config.database_url().to_owned()).await?;
    }
    let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
    pool.ping().await.map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(bind_addr, pool, cookie_settings, settings.server_timeouts()),
    )?;
    info!(%bind_addr, "listening");
    server.await
}
