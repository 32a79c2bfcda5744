//! In-process data store for local development and integration tests.
//!
//! Implements every store-backed port with the same observable behaviour as
//! the remote store: bearer tokens resolve to accounts, listings are scoped
//! by role and refusals surface as the matching [`StoreError`] variant.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{AuthGateway, CategoryStore, ComplaintStore, StoreError, UserDirectory};
use crate::domain::{
    Account, AuthToken, Category, CategoryDraft, CategoryId, Complaint, ComplaintId,
    ComplaintRecord, ComplaintStats, ComplaintStatus, EmailAddress, LoginCredentials,
    NewComplaint, Principal, PrincipalId, Registration, Role, SessionGrant, StatusChange,
};

/// Email of the administrator created by [`MemoryStore::seeded`].
pub const SEED_ADMIN_EMAIL: &str = "admin@complaints.local";
/// Email of the regular user created by [`MemoryStore::seeded`].
pub const SEED_USER_EMAIL: &str = "user@complaints.local";
/// Password shared by both seeded accounts.
pub const SEED_PASSWORD: &str = "password";

struct StoredAccount {
    account: Account,
    password: Zeroizing<String>,
}

#[derive(Default)]
struct MemoryState {
    accounts: Vec<StoredAccount>,
    tokens: HashMap<String, PrincipalId>,
    categories: Vec<Category>,
    complaints: Vec<ComplaintRecord>,
}

impl MemoryState {
    fn account(&self, id: &PrincipalId) -> Option<&Account> {
        self.accounts
            .iter()
            .map(|stored| &stored.account)
            .find(|account| account.id() == id)
    }

    fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    /// Resolve the bearer token to the stored account, ignoring any role
    /// claimed by the caller.
    fn caller(&self, principal: &Principal) -> Result<Account, StoreError> {
        self.tokens
            .get(principal.token().expose())
            .and_then(|id| self.account(id))
            .cloned()
            .ok_or_else(|| StoreError::unauthorized("Not authorized, token failed"))
    }

    fn admin(&self, principal: &Principal) -> Result<Account, StoreError> {
        let caller = self.caller(principal)?;
        if caller.role() == Role::Admin {
            Ok(caller)
        } else {
            Err(StoreError::forbidden("Not authorized as an admin"))
        }
    }

    fn complaint_mut(&mut self, id: &ComplaintId) -> Result<&mut ComplaintRecord, StoreError> {
        self.complaints
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StoreError::not_found("Complaint not found"))
    }

    fn issue_token(&mut self, account: &Account) -> Result<AuthToken, StoreError> {
        let raw = Uuid::new_v4().simple().to_string();
        self.tokens.insert(raw.clone(), account.id().clone());
        AuthToken::new(raw).map_err(|err| StoreError::decode(err.to_string()))
    }

    fn insert_account(
        &mut self,
        name: &str,
        email: &EmailAddress,
        password: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        if self
            .accounts
            .iter()
            .any(|stored| stored.account.email() == email)
        {
            return Err(StoreError::rejected("User already exists"));
        }
        let id = PrincipalId::new(Uuid::new_v4().simple().to_string())
            .map_err(|err| StoreError::decode(err.to_string()))?;
        let account = Account::new(id, name, email.clone(), role)
            .map_err(|err| StoreError::rejected(err.to_string()))?;
        self.accounts.push(StoredAccount {
            account: account.clone(),
            password: Zeroizing::new(password.to_owned()),
        });
        Ok(account)
    }

    fn insert_category(&mut self, draft: &CategoryDraft) -> Result<Category, StoreError> {
        if self
            .categories
            .iter()
            .any(|category| category.name().eq_ignore_ascii_case(draft.name()))
        {
            return Err(StoreError::rejected("Category already exists"));
        }
        let id = CategoryId::new(Uuid::new_v4().simple().to_string())
            .map_err(|_| StoreError::decode("generated category id was blank"))?;
        let category = Category::new(id, draft.clone());
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Populate the display names the remote store would join in.
    fn present(&self, record: &ComplaintRecord) -> Complaint {
        let mut record = record.clone();
        record.owner_name = self
            .account(&record.owner)
            .map(|account| account.name().to_owned());
        record.category_name = self
            .category(&record.category)
            .map(|category| category.name().to_owned());
        record.assignee_name = record
            .assigned_to
            .as_ref()
            .and_then(|id| self.account(id))
            .map(|account| account.name().to_owned());
        Complaint::from(record)
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// An empty store with no accounts or categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one admin, one user and two categories.
    ///
    /// # Errors
    ///
    /// Returns an error only if the seed data fails domain validation.
    pub fn seeded() -> Result<Self, StoreError> {
        let store = Self::new();
        store.add_account("Desk Admin", SEED_ADMIN_EMAIL, SEED_PASSWORD, Role::Admin)?;
        store.add_account("Demo User", SEED_USER_EMAIL, SEED_PASSWORD, Role::User)?;
        store.add_category("Outage", Some("Loss of supply"))?;
        store.add_category("Overbilling", Some("Estimated or disputed bills"))?;
        Ok(store)
    }

    /// Register an account directly, bypassing the public sign-up role rule.
    pub fn add_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        let email = EmailAddress::new(email).map_err(|err| StoreError::rejected(err.to_string()))?;
        self.lock()?.insert_account(name, &email, password, role)
    }

    /// Create a category directly.
    pub fn add_category(&self, name: &str, description: Option<&str>) -> Result<Category, StoreError> {
        let draft = CategoryDraft::try_from_parts(name, description)
            .map_err(|violations| StoreError::rejected(format!("{violations:?}")))?;
        self.lock()?.insert_category(&draft)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::transport("memory store state poisoned"))
    }
}

#[async_trait]
impl AuthGateway for MemoryStore {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, StoreError> {
        let mut state = self.lock()?;
        let account = state
            .accounts
            .iter()
            .find(|stored| {
                stored.account.email() == credentials.email()
                    && stored.password.as_str() == credentials.password()
            })
            .map(|stored| stored.account.clone())
            .ok_or_else(|| StoreError::unauthorized("Invalid email or password"))?;
        let token = state.issue_token(&account)?;
        debug!(user = %account.id(), "memory store issued token");
        Ok(SessionGrant::new(account, token))
    }

    async fn register(&self, registration: &Registration) -> Result<SessionGrant, StoreError> {
        let mut state = self.lock()?;
        let account = state.insert_account(
            registration.name(),
            registration.email(),
            registration.password(),
            Role::User,
        )?;
        let token = state.issue_token(&account)?;
        Ok(SessionGrant::new(account, token))
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    async fn list_complaints(&self, principal: &Principal) -> Result<Vec<Complaint>, StoreError> {
        let state = self.lock()?;
        let caller = state.caller(principal)?;
        Ok(state
            .complaints
            .iter()
            .filter(|record| caller.role() == Role::Admin || &record.owner == caller.id())
            .map(|record| state.present(record))
            .collect())
    }

    async fn create_complaint(
        &self,
        principal: &Principal,
        complaint: &NewComplaint,
    ) -> Result<Complaint, StoreError> {
        let mut state = self.lock()?;
        let caller = state.caller(principal)?;
        if state.category(complaint.category()).is_none() {
            return Err(StoreError::rejected("Invalid category"));
        }
        let now = Utc::now();
        let id = ComplaintId::new(Uuid::new_v4().simple().to_string())
            .map_err(|_| StoreError::decode("generated complaint id was blank"))?;
        let record = ComplaintRecord {
            id,
            owner: caller.id().clone(),
            owner_name: None,
            category: complaint.category().clone(),
            category_name: None,
            status: ComplaintStatus::Pending,
            assigned_to: None,
            assignee_name: None,
            resolution_notes: None,
            title: complaint.title().to_owned(),
            description: complaint.description().to_owned(),
            details: complaint.details().clone(),
            created_at: now,
            updated_at: now,
        };
        let created = state.present(&record);
        state.complaints.push(record);
        Ok(created)
    }

    async fn update_complaint_status(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        change: &StatusChange,
    ) -> Result<Complaint, StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        let record = state.complaint_mut(id)?;
        record.status = change.status();
        if let Some(notes) = change.resolution_notes() {
            record.resolution_notes = Some(notes.to_owned());
        }
        record.updated_at = Utc::now();
        let record = record.clone();
        Ok(state.present(&record))
    }

    async fn assign_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        assignee: &PrincipalId,
    ) -> Result<Complaint, StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        if state.account(assignee).is_none() {
            return Err(StoreError::not_found("Assignee not found"));
        }
        let record = state.complaint_mut(id)?;
        record.assigned_to = Some(assignee.clone());
        record.updated_at = Utc::now();
        let record = record.clone();
        Ok(state.present(&record))
    }

    async fn delete_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        let before = state.complaints.len();
        state.complaints.retain(|record| &record.id != id);
        if state.complaints.len() == before {
            return Err(StoreError::not_found("Complaint not found"));
        }
        Ok(())
    }

    async fn complaint_stats(&self, principal: &Principal) -> Result<ComplaintStats, StoreError> {
        let state = self.lock()?;
        state.admin(principal)?;
        let complaints: Vec<Complaint> = state
            .complaints
            .iter()
            .map(|record| Complaint::from(record.clone()))
            .collect();
        Ok(ComplaintStats::from_complaints(&complaints))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.lock()?.categories.clone())
    }

    async fn create_category(
        &self,
        principal: &Principal,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        state.insert_category(draft)
    }

    async fn update_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        let slot = state
            .categories
            .iter_mut()
            .find(|category| category.id() == id)
            .ok_or_else(|| StoreError::not_found("Category not found"))?;
        *slot = Category::new(id.clone(), draft.clone());
        Ok(slot.clone())
    }

    async fn delete_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        let before = state.categories.len();
        state.categories.retain(|category| category.id() != id);
        if state.categories.len() == before {
            return Err(StoreError::not_found("Category not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn list_users(&self, principal: &Principal) -> Result<Vec<Account>, StoreError> {
        let state = self.lock()?;
        state.admin(principal)?;
        Ok(state
            .accounts
            .iter()
            .map(|stored| stored.account.clone())
            .collect())
    }

    async fn delete_user(
        &self,
        principal: &Principal,
        id: &PrincipalId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.admin(principal)?;
        let before = state.accounts.len();
        state.accounts.retain(|stored| stored.account.id() != id);
        if state.accounts.len() == before {
            return Err(StoreError::not_found("User not found"));
        }
        state.tokens.retain(|_, owner| owner != id);
        Ok(())
    }
}
