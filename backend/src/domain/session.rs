//! The signed-in principal and its lifecycle.
//!
//! An [`IdentitySession`] is an explicitly owned value built per request from
//! a [`SessionVault`] snapshot. Only the methods here change which principal
//! is current.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use super::access::{LOGIN_PATH, landing};
use super::ports::{AuthGateway, PersistedSession, SessionVault, StoreError};
use super::store_failure::map_store_error;
use super::{Error, ErrorCode, LoginCredentials, Principal, Registration, SessionGrant};

/// Holder of the current principal.
pub struct IdentitySession<V> {
    vault: V,
    gateway: Arc<dyn AuthGateway>,
    current: Option<Principal>,
}

impl<V: SessionVault> IdentitySession<V> {
    /// Re-derive the principal persisted in `vault`.
    ///
    /// An absent, unreadable or malformed snapshot yields "no session" and
    /// clears the vault.
    pub fn restore(vault: V, gateway: Arc<dyn AuthGateway>) -> Self {
        let current = match vault.load() {
            Ok(Some(snapshot)) => match snapshot.into_principal() {
                Ok(principal) => Some(principal),
                Err(err) => {
                    warn!(error = %err, "discarding malformed session snapshot");
                    vault.clear();
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "discarding unreadable session snapshot");
                vault.clear();
                None
            }
        };
        Self {
            vault,
            gateway,
            current,
        }
    }

    /// Current principal, if signed in.
    pub fn principal(&self) -> Option<&Principal> {
        self.current.as_ref()
    }

    /// Current principal or an `unauthorized` error redirecting to sign-in.
    pub fn require_principal(&self) -> Result<&Principal, Error> {
        self.current.as_ref().ok_or_else(|| {
            Error::unauthorized("login required").with_details(json!({ "redirect": LOGIN_PATH }))
        })
    }

    /// Landing location for the current principal.
    pub fn home(&self) -> &'static str {
        landing(self.principal())
    }

    /// Backing vault.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Authenticate with email and password.
    ///
    /// Malformed input fails with `invalid_request`, bad credentials with
    /// `unauthorized` and an unreachable service with `service_unavailable`.
    /// A failed attempt leaves the current session untouched.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Principal, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        let grant = self
            .gateway
            .login(&credentials)
            .await
            .map_err(map_login_error)?;
        self.establish(grant.into_principal())
    }

    /// Register a new account and sign it in.
    ///
    /// A malformed form or an email the service already knows fails with
    /// `invalid_request`. The new principal always holds the `user` role.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, Error> {
        let registration = Registration::try_from_parts(name, email, password)?;
        let grant = self
            .gateway
            .register(&registration)
            .await
            .map_err(map_registration_error)?;
        self.establish(SessionGrant::into_user_principal(grant))
    }

    /// Drop the principal and its credential; idempotent.
    pub fn sign_out(&mut self) {
        if let Some(principal) = self.current.take() {
            info!(principal = %principal.id(), "signed out");
        }
        self.vault.clear();
    }

    /// Pass `result` through, signing out when it reports an expired or
    /// rejected credential.
    pub fn settle<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        let rejected = matches!(&result, Err(err) if err.code() == ErrorCode::Unauthorized);
        if rejected {
            debug!("credential rejected by data store; clearing session");
            self.sign_out();
        }
        result
    }

    fn establish(&mut self, principal: Principal) -> Result<Principal, Error> {
        self.vault
            .store(&PersistedSession::from_principal(&principal))
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))?;
        info!(principal = %principal.id(), role = %principal.role(), "signed in");
        self.current = Some(principal.clone());
        Ok(principal)
    }
}

fn map_login_error(error: StoreError) -> Error {
    match error {
        StoreError::Transport { .. } | StoreError::Decode { .. } => map_store_error(error),
        other => Error::unauthorized(format!("sign-in failed: {other}")),
    }
}

fn map_registration_error(error: StoreError) -> Error {
    match error {
        StoreError::Rejected { .. }
        | StoreError::Transport { .. }
        | StoreError::Decode { .. } => map_store_error(error),
        other => Error::unauthorized(format!("registration failed: {other}")),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
