//! Server entry-point: loads settings, wires adapters and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use profiles_api::inbound::http::health::HealthState;

use server::{ServerConfig, ServerSettings, build_profiles, create_server};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let profiles = build_profiles(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr()?, profiles);

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
