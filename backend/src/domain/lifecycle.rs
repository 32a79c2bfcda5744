//! Complaint lifecycle engine.
//!
//! Guards run against a fresh role-scoped listing before any mutation is
//! forwarded to the store, so a refused transition never mutates anything.
//! Each mutation returns the entity the store reports, for callers to merge
//! into their view.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use super::access::{require_role, scope_to_reader};
use super::ports::{ComplaintStore, UserDirectory};
use super::store_failure::map_store_error;
use super::{
    Complaint, ComplaintFilter, ComplaintId, ComplaintStats, ComplaintSubmission, Error,
    Principal, PrincipalId, Role, StatusChange,
};

/// Service applying guarded complaint transitions.
#[derive(Clone)]
pub struct ComplaintLifecycle {
    complaints: Arc<dyn ComplaintStore>,
    users: Arc<dyn UserDirectory>,
}

impl ComplaintLifecycle {
    /// Build the engine over its collaborators.
    pub fn new(complaints: Arc<dyn ComplaintStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { complaints, users }
    }

    /// Complaints `principal` may read, in store order.
    ///
    /// The store scopes listings itself; the read rule is applied again so a
    /// misbehaving store cannot widen what a user sees.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Complaint>, Error> {
        let listed = self
            .complaints
            .list_complaints(principal)
            .await
            .map_err(map_store_error)?;
        Ok(scope_to_reader(principal, listed))
    }

    /// [`Self::list`] narrowed by `filter`.
    pub async fn list_filtered(
        &self,
        principal: &Principal,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, Error> {
        let mut listed = self.list(principal).await?;
        listed.retain(|complaint| filter.matches(complaint));
        Ok(listed)
    }

    /// File a new complaint owned by `principal`; `user` role only.
    pub async fn submit(
        &self,
        principal: &Principal,
        submission: ComplaintSubmission,
    ) -> Result<Complaint, Error> {
        require_role(principal, Role::User, "submit complaints")?;
        let complaint = submission.validate()?;
        let created = self
            .complaints
            .create_complaint(principal, &complaint)
            .await
            .map_err(map_store_error)?;
        info!(
            complaint = %created.id(),
            actor = %principal.id(),
            "complaint submitted"
        );
        Ok(created)
    }

    /// Hand a complaint to `assignee`; status is left unchanged.
    pub async fn assign(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        assignee: &PrincipalId,
    ) -> Result<Complaint, Error> {
        require_role(principal, Role::Admin, "assign complaints")?;
        self.find(principal, id).await?;
        let accounts = self
            .users
            .list_users(principal)
            .await
            .map_err(map_store_error)?;
        if !accounts.iter().any(|account| account.id() == assignee) {
            return Err(Error::not_found(format!("user {assignee} not found")));
        }
        let updated = self
            .complaints
            .assign_complaint(principal, id, assignee)
            .await
            .map_err(map_store_error)?;
        info!(complaint = %id, actor = %principal.id(), %assignee, "complaint assigned");
        Ok(updated)
    }

    /// Move a pending complaint to `in_progress`.
    pub async fn start(&self, principal: &Principal, id: &ComplaintId) -> Result<Complaint, Error> {
        self.transition(principal, id, StatusChange::start()).await
    }

    /// Resolve a non-terminal complaint with `notes`, which may be empty.
    pub async fn resolve(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        notes: &str,
    ) -> Result<Complaint, Error> {
        self.transition(principal, id, StatusChange::resolve(notes))
            .await
    }

    /// Reject a non-terminal complaint.
    pub async fn reject(&self, principal: &Principal, id: &ComplaintId) -> Result<Complaint, Error> {
        self.transition(principal, id, StatusChange::reject()).await
    }

    /// Remove a complaint permanently and return its id.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: &ComplaintId,
    ) -> Result<ComplaintId, Error> {
        require_role(principal, Role::Admin, "delete complaints")?;
        self.find(principal, id).await?;
        self.complaints
            .delete_complaint(principal, id)
            .await
            .map_err(map_store_error)?;
        info!(complaint = %id, actor = %principal.id(), "complaint deleted");
        Ok(id.clone())
    }

    /// Totals by status for the admin dashboard.
    ///
    /// Best effort: a failing read is logged and yields `Ok(None)`. Only the
    /// role check is reported as an error.
    pub async fn stats(&self, principal: &Principal) -> Result<Option<ComplaintStats>, Error> {
        require_role(principal, Role::Admin, "view complaint statistics")?;
        match self.complaints.complaint_stats(principal).await {
            Ok(stats) => Ok(Some(stats)),
            Err(err) => {
                warn!(error = %err, "complaint statistics unavailable");
                Ok(None)
            }
        }
    }

    async fn transition(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        change: StatusChange,
    ) -> Result<Complaint, Error> {
        require_role(principal, Role::Admin, "change complaint status")?;
        let current = self.find(principal, id).await?;
        let from = current.status();
        let to = change.status();
        if !from.can_transition_to(to) {
            warn!(complaint = %id, actor = %principal.id(), %from, %to, "transition refused");
            return Err(
                Error::forbidden(format!("complaint {id} cannot move from {from} to {to}"))
                    .with_details(json!({ "status": from, "requested": to })),
            );
        }
        let updated = self
            .complaints
            .update_complaint_status(principal, id, &change)
            .await
            .map_err(map_store_error)?;
        info!(complaint = %id, actor = %principal.id(), %from, %to, "complaint transitioned");
        Ok(updated)
    }

    async fn find(&self, principal: &Principal, id: &ComplaintId) -> Result<Complaint, Error> {
        self.list(principal)
            .await?
            .into_iter()
            .find(|complaint| complaint.id() == id)
            .ok_or_else(|| Error::not_found(format!("complaint {id} not found")))
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
