//! Port for complaint persistence in the remote data store.

use async_trait::async_trait;

use crate::domain::{
    Complaint, ComplaintId, ComplaintStats, NewComplaint, Principal, PrincipalId, StatusChange,
};

use super::StoreError;

/// Driven port for complaint records.
///
/// Every call carries the acting principal so adapters can forward its
/// bearer credential; the store scopes listings to the principal's role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Complaints visible to `principal`, oldest first.
    async fn list_complaints(&self, principal: &Principal) -> Result<Vec<Complaint>, StoreError>;

    /// Persist a new complaint owned by `principal`.
    async fn create_complaint(
        &self,
        principal: &Principal,
        complaint: &NewComplaint,
    ) -> Result<Complaint, StoreError>;

    /// Apply a status change and return the updated record.
    async fn update_complaint_status(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        change: &StatusChange,
    ) -> Result<Complaint, StoreError>;

    /// Set the assignee and return the updated record.
    async fn assign_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        assignee: &PrincipalId,
    ) -> Result<Complaint, StoreError>;

    /// Remove a complaint permanently.
    async fn delete_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
    ) -> Result<(), StoreError>;

    /// Totals by status.
    async fn complaint_stats(&self, principal: &Principal) -> Result<ComplaintStats, StoreError>;
}
