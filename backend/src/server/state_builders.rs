//! Choose the data store adapter behind every port.

use std::sync::Arc;

use complaint_desk::inbound::http::state::HttpStatePorts;
use complaint_desk::outbound::memory::{SEED_ADMIN_EMAIL, SEED_USER_EMAIL};
use complaint_desk::outbound::{MemoryStore, StoreHttpClient};
use tracing::{info, warn};

use super::settings::DeskSettings;

/// Remote store when a base URL is configured, otherwise the seeded
/// in-memory store.
///
/// # Errors
/// Fails when the settings are malformed or the HTTP client cannot be built.
pub fn build_ports(settings: &DeskSettings) -> std::io::Result<HttpStatePorts> {
    let store_url = settings.store_url().map_err(std::io::Error::other)?;
    match store_url {
        Some(base) => {
            let client = StoreHttpClient::new(base, settings.request_timeout())
                .map_err(|err| std::io::Error::other(format!("store client: {err}")))?;
            info!(base = %client.base(), "using remote data store");
            Ok(HttpStatePorts::uniform(Arc::new(client)))
        }
        None => {
            let store = MemoryStore::seeded()
                .map_err(|err| std::io::Error::other(format!("seed memory store: {err}")))?;
            warn!(
                admin = SEED_ADMIN_EMAIL,
                user = SEED_USER_EMAIL,
                "no store URL configured; using seeded in-memory store (dev only)"
            );
            Ok(HttpStatePorts::uniform(Arc::new(store)))
        }
    }
}
