//! Port for the store's account directory.

use async_trait::async_trait;

use crate::domain::{Account, Principal, PrincipalId};

use super::StoreError;

/// Driven port listing and removing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every registered account.
    async fn list_users(&self, principal: &Principal) -> Result<Vec<Account>, StoreError>;

    /// Remove an account.
    async fn delete_user(&self, principal: &Principal, id: &PrincipalId)
    -> Result<(), StoreError>;
}
