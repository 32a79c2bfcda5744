//! Complaint entity, its status machine and the submission form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, FieldViolations, PrincipalId};

/// Minimum trimmed title length.
pub const MIN_TITLE_LEN: usize = 5;
/// Minimum trimmed description length.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Store-assigned complaint identifier, stable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(String);

/// Raised when an identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("complaint id must not be blank")]
pub struct EmptyComplaintId;

impl ComplaintId {
    /// Wrap a non-blank identifier, trimming surrounding whitespace.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EmptyComplaintId> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(EmptyComplaintId);
        }
        Ok(Self(id.to_owned()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ComplaintId> for String {
    fn from(value: ComplaintId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = EmptyComplaintId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Position of a complaint in its lifecycle.
///
/// ```text
/// pending ──► in_progress ──► resolved
///    │              └───────► rejected
///    ├──────────────────────► resolved
///    └──────────────────────► rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Newly submitted, awaiting triage.
    Pending,
    /// Being worked on.
    InProgress,
    /// Fixed; terminal.
    Resolved,
    /// Declined; terminal.
    Rejected,
}

/// Raised when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown complaint status: {0}")]
pub struct UnknownStatus(pub String);

impl ComplaintStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    /// Whether `self → next` is an edge of the lifecycle graph.
    ///
    /// # Examples
    /// ```
    /// use complaint_desk::domain::ComplaintStatus;
    ///
    /// assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Resolved));
    /// assert!(!ComplaintStatus::Resolved.can_transition_to(ComplaintStatus::Rejected));
    /// assert!(!ComplaintStatus::InProgress.can_transition_to(ComplaintStatus::Pending));
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::InProgress | Self::Resolved | Self::Rejected) => true,
            (Self::InProgress, Self::Resolved | Self::Rejected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Utility-specific metadata captured once at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintDetails {
    /// Distribution company serving the customer.
    pub service_provider: Option<String>,
    /// Prepaid or postpaid meter number.
    pub meter_number: Option<String>,
    /// Billing account number.
    pub account_number: Option<String>,
    /// Contact number for follow-up.
    pub phone_number: Option<String>,
    /// Street address or location description.
    pub address: Option<String>,
    /// State.
    pub region: Option<String>,
    /// Local government area.
    pub sub_region: Option<String>,
    /// Feeder or transformer name.
    pub feeder_or_transformer: Option<String>,
}

/// Plain data used to build a [`Complaint`], typically decoded from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintRecord {
    /// Store-assigned identifier.
    pub id: ComplaintId,
    /// Submitting user.
    pub owner: PrincipalId,
    /// Submitter's name when the store populated the reference.
    pub owner_name: Option<String>,
    /// Category the complaint was filed under.
    pub category: CategoryId,
    /// Category name when the store populated the reference.
    pub category_name: Option<String>,
    /// Lifecycle state.
    pub status: ComplaintStatus,
    /// Account handling the complaint, if any.
    pub assigned_to: Option<PrincipalId>,
    /// Assignee's name when the store populated the reference.
    pub assignee_name: Option<String>,
    /// Notes left on resolution; dropped for any other status.
    pub resolution_notes: Option<String>,
    /// Short summary, trimmed.
    pub title: String,
    /// Free-text account of the issue, trimmed.
    pub description: String,
    /// Meter, contact and location metadata.
    pub details: ComplaintDetails,
    /// When the store accepted the complaint.
    pub created_at: DateTime<Utc>,
    /// Last mutation time reported by the store.
    pub updated_at: DateTime<Utc>,
}

/// A reported service issue.
///
/// ## Invariants
/// - Exactly one owner and at most one assignee.
/// - `resolution_notes` is only exposed while the status is `resolved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    record: ComplaintRecord,
}

impl From<ComplaintRecord> for Complaint {
    fn from(mut record: ComplaintRecord) -> Self {
        if record.status != ComplaintStatus::Resolved {
            record.resolution_notes = None;
        }
        Self { record }
    }
}

impl Complaint {
    /// Store-assigned identifier.
    pub fn id(&self) -> &ComplaintId {
        &self.record.id
    }

    /// Submitter.
    pub fn owner(&self) -> &PrincipalId {
        &self.record.owner
    }

    /// Submitter's display name when the store populated it.
    pub fn owner_name(&self) -> Option<&str> {
        self.record.owner_name.as_deref()
    }

    /// Category the complaint was filed under.
    pub fn category(&self) -> &CategoryId {
        &self.record.category
    }

    /// Category display name when the store populated it.
    pub fn category_name(&self) -> Option<&str> {
        self.record.category_name.as_deref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ComplaintStatus {
        self.record.status
    }

    /// Admin or agent handling the complaint.
    pub fn assigned_to(&self) -> Option<&PrincipalId> {
        self.record.assigned_to.as_ref()
    }

    /// Assignee display name when the store populated it.
    pub fn assignee_name(&self) -> Option<&str> {
        self.record.assignee_name.as_deref()
    }

    /// Resolution notes; always `None` unless the complaint is resolved.
    pub fn resolution_notes(&self) -> Option<&str> {
        self.record.resolution_notes.as_deref()
    }

    /// Short summary.
    pub fn title(&self) -> &str {
        self.record.title.as_str()
    }

    /// Free-text account of the issue.
    pub fn description(&self) -> &str {
        self.record.description.as_str()
    }

    /// Meter, contact and location metadata.
    pub fn details(&self) -> &ComplaintDetails {
        &self.record.details
    }

    /// Submission time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }

    /// Time of the most recent mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.record.updated_at
    }

    /// Whether `principal_id` submitted or is handling this complaint.
    pub fn involves(&self, principal_id: &PrincipalId) -> bool {
        self.owner() == principal_id || self.assigned_to() == Some(principal_id)
    }

    /// Recover the underlying record.
    pub fn into_record(self) -> ComplaintRecord {
        self.record
    }
}

/// Raw complaint form as typed by the submitter.
///
/// Nothing here is validated until [`ComplaintSubmission::validate`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSubmission {
    /// Summary; at least [`MIN_TITLE_LEN`] characters once trimmed.
    pub title: String,
    /// Details; at least [`MIN_DESCRIPTION_LEN`] characters once trimmed.
    pub description: String,
    /// Category id; required.
    pub category: String,
    pub service_provider: Option<String>,
    pub meter_number: Option<String>,
    pub account_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub feeder_or_transformer: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn check_length(
    violations: &mut FieldViolations,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) {
    if value.is_empty() {
        violations.push(field, "required", format!("{label} is required"));
    } else if value.chars().count() < min {
        violations.push(
            field,
            "too_short",
            format!("{label} must be at least {min} characters"),
        );
    }
}

impl ComplaintSubmission {
    /// Validate the form, reporting every violated field.
    ///
    /// Free text is trimmed before length checks and blank optional
    /// metadata is dropped.
    ///
    /// # Examples
    /// ```
    /// use complaint_desk::domain::ComplaintSubmission;
    ///
    /// let submission = ComplaintSubmission {
    ///     title: "Outage".into(),
    ///     description: "No power since Monday".into(),
    ///     category: "cat-1".into(),
    ///     meter_number: Some("4501".into()),
    ///     phone_number: Some("0800".into()),
    ///     address: Some("12 Marina".into()),
    ///     ..ComplaintSubmission::default()
    /// };
    /// assert!(submission.validate().is_ok());
    /// ```
    pub fn validate(self) -> Result<NewComplaint, FieldViolations> {
        let mut violations = FieldViolations::default();
        let title = self.title.trim();
        let description = self.description.trim();
        check_length(&mut violations, "title", "Title", title, MIN_TITLE_LEN);
        check_length(
            &mut violations,
            "description",
            "Description",
            description,
            MIN_DESCRIPTION_LEN,
        );
        let category = match CategoryId::new(&self.category) {
            Ok(category) => Some(category),
            Err(_) => {
                violations.push("category", "required", "Category is required");
                None
            }
        };

        let details = ComplaintDetails {
            service_provider: present(self.service_provider),
            meter_number: present(self.meter_number),
            account_number: present(self.account_number),
            phone_number: present(self.phone_number),
            address: present(self.address),
            region: present(self.region),
            sub_region: present(self.sub_region),
            feeder_or_transformer: present(self.feeder_or_transformer),
        };
        if details.meter_number.is_none() && details.account_number.is_none() {
            violations.push(
                "meterNumber",
                "meter_or_account_required",
                "Provide at least a Meter Number or Account Number",
            );
        }
        if details.phone_number.is_none() {
            violations.push(
                "phoneNumber",
                "required",
                "Phone number is required for follow-up",
            );
        }
        if details.address.is_none() {
            violations.push("address", "required", "Address / location is required");
        }

        match category {
            Some(category) if violations.is_empty() => Ok(NewComplaint {
                title: title.to_owned(),
                description: description.to_owned(),
                category,
                details,
            }),
            _ => Err(violations),
        }
    }
}

/// Validated complaint content ready to forward to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    title: String,
    description: String,
    category: CategoryId,
    details: ComplaintDetails,
}

impl NewComplaint {
    /// Trimmed summary.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Trimmed description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Chosen category.
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Metadata with blank entries removed.
    pub fn details(&self) -> &ComplaintDetails {
        &self.details
    }
}

/// Status change forwarded to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    status: ComplaintStatus,
    resolution_notes: Option<String>,
}

impl StatusChange {
    /// Move to `in_progress`.
    pub fn start() -> Self {
        Self {
            status: ComplaintStatus::InProgress,
            resolution_notes: None,
        }
    }

    /// Move to `resolved` with notes, which may be empty.
    pub fn resolve(notes: impl Into<String>) -> Self {
        Self {
            status: ComplaintStatus::Resolved,
            resolution_notes: Some(notes.into().trim().to_owned()),
        }
    }

    /// Move to `rejected`.
    pub fn reject() -> Self {
        Self {
            status: ComplaintStatus::Rejected,
            resolution_notes: None,
        }
    }

    /// Target status.
    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    /// Notes stored on resolution.
    pub fn resolution_notes(&self) -> Option<&str> {
        self.resolution_notes.as_deref()
    }
}
