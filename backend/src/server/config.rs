//! HTTP server configuration object.

use std::net::SocketAddr;

use complaint_desk::inbound::http::session_config::SessionSettings;
use complaint_desk::inbound::http::state::HttpStatePorts;

/// Validated inputs for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ports: HttpStatePorts,
}

impl ServerConfig {
    /// Bundle already validated pieces.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, ports: HttpStatePorts) -> Self {
        Self {
            session,
            bind_addr,
            ports,
        }
    }
}
