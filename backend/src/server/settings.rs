//! Service settings loaded via OrthoConfig.
//!
//! Every field can come from the CLI, `COMPLAINT_DESK_*` environment
//! variables or a config file. Session toggles stay as raw strings so
//! [`session_settings`](complaint_desk::inbound::http::session_config::session_settings)
//! can apply build-mode rules to them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use complaint_desk::inbound::http::session_config::SessionToggles;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid store URL '{value}': {source}")]
    StoreUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMPLAINT_DESK")]
pub struct DeskSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Base URL of the remote data store; the seeded in-memory store is used
    /// when absent.
    pub store_url: Option<String>,
    /// Per-request timeout for data store calls.
    pub request_timeout_secs: Option<u64>,
    /// Raw session toggles; validated via [`SessionToggles`].
    pub session_key_file: Option<PathBuf>,
    pub session_cookie_secure: Option<String>,
    pub session_same_site: Option<String>,
    pub session_allow_ephemeral: Option<String>,
}

impl DeskSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn store_url(&self) -> Result<Option<Url>, SettingsError> {
        self.store_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::StoreUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}
