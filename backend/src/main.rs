//! Soapbox entry-point: loads settings, prepares adapters, and runs the server.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use soapbox::inbound::http::health::HealthState;
use soapbox::middleware::RouterPolicy;
use soapbox::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use soapbox::server::{ServerConfig, create_server};
use soapbox::settings::AppSettings;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

/// Build the server configuration, connecting to PostgreSQL when configured.
async fn server_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid bind address", err))?;
    let static_source = settings
        .static_source()
        .map_err(|err| startup_error("invalid static source", err))?;
    let public_base_url = settings
        .public_base_url()
        .map_err(|err| startup_error("invalid public base URL", err))?;
    let policy = RouterPolicy::new(settings.cors_allow_origin())
        .map_err(|err| startup_error("invalid CORS origin", err))?;

    let config = ServerConfig::new(bind_addr, static_source)
        .with_media_dir(settings.media_dir.clone())
        .with_static_fetch_timeout(settings.static_fetch_timeout())
        .with_public_base_url(public_base_url)
        .with_policy(policy);

    let Some(url) = settings.database_url.as_deref() else {
        warn!("SOAPBOX_DATABASE_URL not set; data will not survive a restart");
        return Ok(config);
    };

    run_migrations(url)
        .await
        .map_err(|err| startup_error("database migration failed", err))?;
    let max_size = settings
        .database_max_connections()
        .map_err(|err| startup_error("invalid pool size", err))?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(max_size))
        .await
        .map_err(|err| startup_error("database pool failed", err))?;
    info!(max_size, "database pool ready");
    Ok(config.with_db_pool(pool))
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
        .map_err(|err| startup_error("failed to load settings", err))?;
    let config = server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
