//! Complaint desk entry-point: loads settings, validates session
//! configuration and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use complaint_desk::inbound::http::health::HealthState;
use complaint_desk::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings,
};
use server::settings::DeskSettings;
use server::{ServerConfig, build_ports, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DeskSettings::load()
        .map_err(|err| std::io::Error::other(format!("load settings: {err}")))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let ports = build_ports(&settings)?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind_addr, ports),
    )?;
    info!(%bind_addr, "complaint desk listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
