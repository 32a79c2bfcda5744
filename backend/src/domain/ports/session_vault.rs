//! Port for persisting the signed-in principal between requests.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AuthToken, EmailAddress, Principal, PrincipalId, PrincipalValidationError, Role,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session vault adapters.
    pub enum VaultError {
        /// Reading the snapshot failed or it could not be decoded.
        Read { message: String } => "session snapshot could not be read: {message}",
        /// Writing the snapshot failed.
        Write { message: String } => "session snapshot could not be written: {message}",
    }
}

/// Serialisable snapshot of a principal and its credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Principal id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Access class at sign-in time.
    pub role: Role,
    /// Bearer credential issued by the data store.
    pub token: String,
}

impl PersistedSession {
    /// Snapshot `principal`.
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            id: principal.id().to_string(),
            name: principal.name().to_owned(),
            email: principal.email().to_string(),
            role: principal.role(),
            token: principal.token().expose().to_owned(),
        }
    }

    /// Rebuild the principal, revalidating every field.
    pub fn into_principal(self) -> Result<Principal, PrincipalValidationError> {
        let account = Account::new(
            PrincipalId::new(self.id)?,
            self.name,
            EmailAddress::new(self.email)?,
            self.role,
        )?;
        Ok(Principal::new(account, AuthToken::new(self.token)?))
    }
}

/// Driven port holding at most one session snapshot.
///
/// Implementations are request-local and need not be `Send`.
#[cfg_attr(test, mockall::automock)]
pub trait SessionVault {
    /// Current snapshot, if any.
    fn load(&self) -> Result<Option<PersistedSession>, VaultError>;

    /// Replace the snapshot.
    fn store(&self, session: &PersistedSession) -> Result<(), VaultError>;

    /// Drop the snapshot; idempotent.
    fn clear(&self);
}

/// In-process vault for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct EphemeralSessionVault {
    slot: RefCell<Option<PersistedSession>>,
}

impl EphemeralSessionVault {
    /// Vault pre-loaded with `session`.
    pub fn holding(session: PersistedSession) -> Self {
        Self {
            slot: RefCell::new(Some(session)),
        }
    }
}

impl SessionVault for EphemeralSessionVault {
    fn load(&self) -> Result<Option<PersistedSession>, VaultError> {
        Ok(self.slot.borrow().clone())
    }

    fn store(&self, session: &PersistedSession) -> Result<(), VaultError> {
        self.slot.replace(Some(session.clone()));
        Ok(())
    }

    fn clear(&self) {
        self.slot.replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::principal;
    use rstest::rstest;

    #[rstest]
    fn snapshot_round_trips_principal() {
        let original = principal("u1", Role::User);
        let restored = PersistedSession::from_principal(&original)
            .into_principal()
            .expect("valid snapshot");
        assert_eq!(restored, original);
    }

    #[rstest]
    fn tampered_snapshot_is_rejected() {
        let mut snapshot = PersistedSession::from_principal(&principal("u1", Role::User));
        snapshot.token = "  ".into();
        assert_eq!(
            snapshot.into_principal(),
            Err(PrincipalValidationError::EmptyToken)
        );
    }

    #[rstest]
    fn ephemeral_vault_clear_is_idempotent() {
        let vault = EphemeralSessionVault::holding(PersistedSession::from_principal(&principal(
            "u1",
            Role::User,
        )));
        vault.clear();
        vault.clear();
        assert_eq!(vault.load(), Ok(None));
    }
}
