//! RoadGuard entry point: loads settings, migrates the database, wires the
//! services and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mockable::DefaultEnv;
use roadguard::inbound::http::health::HealthState;
use roadguard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use roadguard::outbound::persistence::{DbPool, run_pending_migrations};
use roadguard::settings::AppSettings;
use server::{ServerConfig, build_http_state, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .map_err(std::io::Error::other)?;

    run_pending_migrations(settings.database_url())
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(settings.pool_config())
        .await
        .map_err(std::io::Error::other)?;
    let http_state = build_http_state(&pool, &settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        http_state,
        ServerConfig::new(session.key, session.cookie_secure, bind_addr),
    )?;
    info!(%bind_addr, "roadguard listening");
    server.await
}
