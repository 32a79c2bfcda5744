//! Port for category records.

use async_trait::async_trait;

use crate::domain::{Category, CategoryDraft, CategoryId, Principal};

use super::StoreError;

/// Driven port for complaint categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Every category; readable without a credential.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn create_category(
        &self,
        principal: &Principal,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError>;

    async fn update_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError>;

    async fn delete_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
    ) -> Result<(), StoreError>;
}
