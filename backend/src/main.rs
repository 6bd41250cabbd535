//! Backend entry-point: loads settings, wires storage and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use giravent::inbound::http::health::HealthState;
use server::{ServerConfig, Settings, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let http_state = build_http_state(&settings)
        .await
        .map_err(std::io::Error::other)?;

    if let Some(admin) = settings
        .bootstrap_admin()
        .map_err(std::io::Error::other)?
    {
        http_state
            .accounts
            .ensure_admin(admin)
            .await
            .map_err(|e| std::io::Error::other(format!("bootstrap admin failed: {e}")))?;
    }

    let config = ServerConfig::from(&settings);
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &config)?;
    info!(host = %config.host, port = config.port, "listening");
    server.await
}
