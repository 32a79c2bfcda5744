//! Test utilities for the complaint desk crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! when the `test-support` feature is enabled.

pub mod fixtures {
    //! Builders for domain values with sensible defaults.

    use chrono::{TimeZone, Utc};

    use crate::domain::{
        Account, AuthToken, CategoryId, Complaint, ComplaintDetails, ComplaintId,
        ComplaintRecord, ComplaintStatus, Principal, PrincipalId, Role,
    };

    /// Account with a derived email address, e.g. `u1@example.com`.
    ///
    /// # Panics
    /// Panics when `id` is not a valid principal id.
    pub fn account(id: &str, role: Role) -> Account {
        Account::try_from_parts(id, &format!("Person {id}"), &format!("{id}@example.com"), role.as_str())
            .unwrap_or_else(|err| panic!("fixture account {id}: {err}"))
    }

    /// Principal holding the token `token-<id>`.
    ///
    /// # Panics
    /// Panics when `id` is not a valid principal id.
    pub fn principal(id: &str, role: Role) -> Principal {
        let token = AuthToken::new(format!("token-{id}"))
            .unwrap_or_else(|err| panic!("fixture token {id}: {err}"));
        Principal::new(account(id, role), token)
    }

    /// Complaint record owned by `owner` in `category`.
    ///
    /// # Panics
    /// Panics when any id is blank.
    pub fn complaint_record(
        id: &str,
        owner: &str,
        category: &str,
        status: ComplaintStatus,
    ) -> ComplaintRecord {
        let created = Utc
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("fixture timestamp"));
        ComplaintRecord {
            id: ComplaintId::new(id).unwrap_or_else(|err| panic!("{err}")),
            owner: PrincipalId::new(owner).unwrap_or_else(|err| panic!("{err}")),
            owner_name: None,
            category: CategoryId::new(category).unwrap_or_else(|err| panic!("{err}")),
            category_name: None,
            status,
            assigned_to: None,
            assignee_name: None,
            resolution_notes: None,
            title: format!("Complaint {id}"),
            description: "Power has been out since Monday".into(),
            details: ComplaintDetails {
                meter_number: Some("45010023".into()),
                phone_number: Some("08030000000".into()),
                address: Some("12 Marina Road".into()),
                ..ComplaintDetails::default()
            },
            created_at: created,
            updated_at: created,
        }
    }

    /// Complaint built from [`complaint_record`].
    pub fn complaint(id: &str, owner: &str, category: &str, status: ComplaintStatus) -> Complaint {
        Complaint::from(complaint_record(id, owner, category, status))
    }
}
