//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthGateway, CategoryStore, ComplaintStore, UserDirectory};
use crate::domain::{AccountDirectory, CategoryCatalogue, ComplaintLifecycle, IdentitySession};
use crate::inbound::http::session::SessionContext;

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Sign-in and sign-up.
    pub auth: Arc<dyn AuthGateway>,
    /// Complaint persistence.
    pub complaints: Arc<dyn ComplaintStore>,
    /// Category persistence.
    pub categories: Arc<dyn CategoryStore>,
    /// Account directory; also resolves assignees.
    pub users: Arc<dyn UserDirectory>,
}

impl HttpStatePorts {
    /// Use one adapter for every port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use complaint_desk::inbound::http::state::{HttpState, HttpStatePorts};
    /// use complaint_desk::outbound::MemoryStore;
    ///
    /// let state = HttpState::new(HttpStatePorts::uniform(Arc::new(MemoryStore::new())));
    /// let _lifecycle = state.lifecycle.clone();
    /// ```
    pub fn uniform<A>(adapter: Arc<A>) -> Self
    where
        A: AuthGateway + ComplaintStore + CategoryStore + UserDirectory + 'static,
    {
        Self {
            auth: adapter.clone(),
            complaints: adapter.clone(),
            categories: adapter.clone(),
            users: adapter,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Gateway handed to each request's [`IdentitySession`].
    pub auth: Arc<dyn AuthGateway>,
    pub lifecycle: ComplaintLifecycle,
    pub categories: CategoryCatalogue,
    pub accounts: AccountDirectory,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire the domain services over `ports`.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            complaints,
            categories,
            users,
        } = ports;
        Self {
            auth,
            lifecycle: ComplaintLifecycle::new(complaints, users.clone()),
            categories: CategoryCatalogue::new(categories),
            accounts: AccountDirectory::new(users),
        }
    }

    /// Restore the caller's identity from their session cookie.
    pub fn identity(&self, session: SessionContext) -> IdentitySession<SessionContext> {
        IdentitySession::restore(session, self.auth.clone())
    }
}
