//! Wire shapes exchanged with the remote data store.
//!
//! The store keys records by `_id` and may populate references (`user`,
//! `category`, `assignedTo`) either as a bare id or as an embedded object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AuthToken, Category, CategoryDraft, CategoryId, Complaint, ComplaintDetails,
    ComplaintId, ComplaintRecord, ComplaintStats, ComplaintStatus, LoginCredentials,
    NewComplaint, PrincipalId, Registration, SessionGrant, StatusChange,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ReferenceDto {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ReferenceDto {
    fn into_parts(self) -> (String, Option<String>) {
        match self {
            Self::Id(id) => (id, None),
            Self::Populated { id, name } => (id, name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ComplaintDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    user: ReferenceDto,
    category: ReferenceDto,
    status: ComplaintStatus,
    #[serde(default)]
    assigned_to: Option<ReferenceDto>,
    #[serde(default)]
    resolution_notes: Option<String>,
    title: String,
    description: String,
    #[serde(default)]
    disco: Option<String>,
    #[serde(default)]
    meter_number: Option<String>,
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    lga: Option<String>,
    #[serde(default)]
    feeder_or_transformer: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ComplaintDto> for Complaint {
    type Error = String;

    fn try_from(dto: ComplaintDto) -> Result<Self, Self::Error> {
        let (owner, owner_name) = dto.user.into_parts();
        let (category, category_name) = dto.category.into_parts();
        let (assigned_to, assignee_name) = match dto.assigned_to.map(ReferenceDto::into_parts) {
            Some((id, name)) => (
                Some(PrincipalId::new(id).map_err(|err| format!("assignedTo: {err}"))?),
                name,
            ),
            None => (None, None),
        };
        Ok(Complaint::from(ComplaintRecord {
            id: ComplaintId::new(&dto.id).map_err(|err| format!("_id: {err}"))?,
            owner: PrincipalId::new(owner).map_err(|err| format!("user: {err}"))?,
            owner_name,
            category: CategoryId::new(category).map_err(|err| format!("category: {err}"))?,
            category_name,
            status: dto.status,
            assigned_to,
            assignee_name,
            resolution_notes: dto.resolution_notes,
            title: dto.title,
            description: dto.description,
            details: ComplaintDetails {
                service_provider: dto.disco,
                meter_number: dto.meter_number,
                account_number: dto.account_number,
                phone_number: dto.phone_number,
                address: dto.address,
                region: dto.state,
                sub_region: dto.lga,
                feeder_or_transformer: dto.feeder_or_transformer,
            },
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateComplaintBody<'a> {
    title: &'a str,
    description: &'a str,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    disco: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meter_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lga: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feeder_or_transformer: Option<&'a str>,
}

impl<'a> From<&'a NewComplaint> for CreateComplaintBody<'a> {
    fn from(complaint: &'a NewComplaint) -> Self {
        let details = complaint.details();
        Self {
            title: complaint.title(),
            description: complaint.description(),
            category: complaint.category().as_str(),
            disco: details.service_provider.as_deref(),
            meter_number: details.meter_number.as_deref(),
            account_number: details.account_number.as_deref(),
            phone_number: details.phone_number.as_deref(),
            address: details.address.as_deref(),
            state: details.region.as_deref(),
            lga: details.sub_region.as_deref(),
            feeder_or_transformer: details.feeder_or_transformer.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusBody<'a> {
    status: ComplaintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution_notes: Option<&'a str>,
}

impl<'a> From<&'a StatusChange> for StatusBody<'a> {
    fn from(change: &'a StatusChange) -> Self {
        Self {
            status: change.status(),
            resolution_notes: change.resolution_notes(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignBody<'a> {
    pub assigned_to: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoryDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<CategoryDto> for Category {
    type Error = String;

    fn try_from(dto: CategoryDto) -> Result<Self, Self::Error> {
        let id = CategoryId::new(&dto.id).map_err(|err| format!("_id: {err}"))?;
        let draft = CategoryDraft::try_from_parts(&dto.name, dto.description.as_deref())
            .map_err(|err| format!("category {id}: {err}"))?;
        Ok(Category::new(id, draft))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl<'a> From<&'a CategoryDraft> for CategoryBody<'a> {
    fn from(draft: &'a CategoryDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    name: String,
    email: String,
    #[serde(default = "default_role")]
    role: String,
}

fn default_role() -> String {
    "user".to_owned()
}

impl TryFrom<UserDto> for Account {
    type Error = String;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        Account::try_from_parts(&dto.id, &dto.name, &dto.email, &dto.role)
            .map_err(|err| format!("user {}: {err}", dto.id))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponseDto {
    user: UserDto,
    token: String,
}

impl TryFrom<AuthResponseDto> for SessionGrant {
    type Error = String;

    fn try_from(dto: AuthResponseDto) -> Result<Self, Self::Error> {
        let account = Account::try_from(dto.user)?;
        let token = AuthToken::new(dto.token).map_err(|err| err.to_string())?;
        Ok(SessionGrant::new(account, token))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for LoginBody<'a> {
    fn from(credentials: &'a LoginCredentials) -> Self {
        Self {
            email: credentials.email().as_str(),
            password: credentials.password(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Registration> for RegisterBody<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            name: registration.name(),
            email: registration.email().as_str(),
            password: registration.password(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StatsDto {
    total: u64,
    pending: u64,
    resolved: u64,
    rejected: u64,
}

impl From<StatsDto> for ComplaintStats {
    fn from(dto: StatsDto) -> Self {
        Self {
            total: dto.total,
            pending: dto.pending,
            resolved: dto.resolved,
            rejected: dto.rejected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageDto {
    pub message: String,
}
