//! Port for the external authentication service.
//!
//! Password storage and hashing live behind this port; the crate only ever
//! forwards credentials and receives a bearer token.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, Registration, SessionGrant};

use super::StoreError;

/// Driven port for sign-in and sign-up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a grant; bad credentials yield
    /// [`StoreError::Unauthorized`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, StoreError>;

    /// Create an account and sign it in; a taken email yields
    /// [`StoreError::Rejected`].
    async fn register(&self, registration: &Registration) -> Result<SessionGrant, StoreError>;
}
