//! Administrative services: category catalogue and account directory.

use std::sync::Arc;

use tracing::info;

use super::access::require_role;
use super::ports::{CategoryStore, UserDirectory};
use super::store_failure::map_store_error;
use super::{Account, Category, CategoryDraft, CategoryId, Error, Principal, PrincipalId, Role};

/// Category listing for everyone, management for admins.
#[derive(Clone)]
pub struct CategoryCatalogue {
    store: Arc<dyn CategoryStore>,
}

impl CategoryCatalogue {
    /// Catalogue backed by `store`.
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Every category; no sign-in required.
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        self.store.list_categories().await.map_err(map_store_error)
    }

    /// Add a category; admins only.
    pub async fn create(
        &self,
        principal: &Principal,
        draft: CategoryDraft,
    ) -> Result<Category, Error> {
        require_role(principal, Role::Admin, "manage categories")?;
        let created = self
            .store
            .create_category(principal, &draft)
            .await
            .map_err(map_store_error)?;
        info!(category = %created.id(), actor = %principal.id(), "category created");
        Ok(created)
    }

    /// Rename or re-describe a category; admins only.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, Error> {
        require_role(principal, Role::Admin, "manage categories")?;
        self.store
            .update_category(principal, id, &draft)
            .await
            .map_err(map_store_error)
    }

    /// Remove a category and return its id.
    pub async fn delete(&self, principal: &Principal, id: &CategoryId) -> Result<CategoryId, Error> {
        require_role(principal, Role::Admin, "manage categories")?;
        self.store
            .delete_category(principal, id)
            .await
            .map_err(map_store_error)?;
        info!(category = %id, actor = %principal.id(), "category deleted");
        Ok(id.clone())
    }
}

/// Admin view over registered accounts.
#[derive(Clone)]
pub struct AccountDirectory {
    users: Arc<dyn UserDirectory>,
}

impl AccountDirectory {
    /// Directory backed by `users`.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Every registered account; admins only.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Account>, Error> {
        require_role(principal, Role::Admin, "list users")?;
        self.users
            .list_users(principal)
            .await
            .map_err(map_store_error)
    }

    /// Remove an account other than the caller's own.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: &PrincipalId,
    ) -> Result<PrincipalId, Error> {
        require_role(principal, Role::Admin, "delete users")?;
        if principal.id() == id {
            return Err(Error::forbidden("administrators cannot delete their own account"));
        }
        self.users
            .delete_user(principal, id)
            .await
            .map_err(map_store_error)?;
        info!(user = %id, actor = %principal.id(), "user deleted");
        Ok(id.clone())
    }
}
