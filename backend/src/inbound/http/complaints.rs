//! Complaint handlers.
//!
//! ```text
//! GET /api/v1/complaints?status=pending&category=c1&party=u1
//! POST /api/v1/complaints
//! PATCH /api/v1/complaints/{id}/assign {"assignedTo":"a2"}
//! PUT /api/v1/complaints/{id} {"status":"resolved","resolutionNotes":"Fuse replaced"}
//! DELETE /api/v1/complaints/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CategoryId, Complaint, ComplaintFilter, ComplaintId, ComplaintStatus, ComplaintSubmission,
    Error, PrincipalId, RouteClass,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gate::admit;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Complaint as returned to the UI.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintBody {
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "pending")]
    pub status: String,
    pub category_id: String,
    pub category_name: Option<String>,
    pub owner_id: String,
    pub owner_name: Option<String>,
    pub assigned_to: Option<String>,
    pub assignee_name: Option<String>,
    pub resolution_notes: Option<String>,
    pub service_provider: Option<String>,
    pub meter_number: Option<String>,
    pub account_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub feeder_or_transformer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Complaint> for ComplaintBody {
    fn from(complaint: &Complaint) -> Self {
        let details = complaint.details().clone();
        Self {
            id: complaint.id().to_string(),
            title: complaint.title().to_owned(),
            description: complaint.description().to_owned(),
            status: complaint.status().as_str().to_owned(),
            category_id: complaint.category().to_string(),
            category_name: complaint.category_name().map(str::to_owned),
            owner_id: complaint.owner().to_string(),
            owner_name: complaint.owner_name().map(str::to_owned),
            assigned_to: complaint.assigned_to().map(ToString::to_string),
            assignee_name: complaint.assignee_name().map(str::to_owned),
            resolution_notes: complaint.resolution_notes().map(str::to_owned),
            service_provider: details.service_provider,
            meter_number: details.meter_number,
            account_number: details.account_number,
            phone_number: details.phone_number,
            address: details.address,
            region: details.region,
            sub_region: details.sub_region,
            feeder_or_transformer: details.feeder_or_transformer,
            created_at: complaint.created_at(),
            updated_at: complaint.updated_at(),
        }
    }
}

/// Request body for `POST /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    #[schema(example = "No power on Marina Road")]
    pub title: String,
    pub description: String,
    #[schema(example = "64b7f0c2a1")]
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

impl From<SubmitComplaintRequest> for ComplaintSubmission {
    fn from(request: SubmitComplaintRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            service_provider: request.service_provider,
            meter_number: request.meter_number,
            account_number: request.account_number,
            phone_number: request.phone_number,
            address: request.address,
            region: request.region,
            sub_region: request.sub_region,
            feeder_or_transformer: request.feeder_or_transformer,
        }
    }
}

/// Request body for `PATCH /api/v1/complaints/{id}/assign`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_to: String,
}

/// Request body for `PUT /api/v1/complaints/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[schema(example = "resolved")]
    pub status: String,
    pub resolution_notes: Option<String>,
}

/// Identifier of a removed record.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBody {
    pub id: String,
}

/// Listing filters; empty values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only complaints in this status.
    pub status: Option<String>,
    /// Only complaints in this category.
    pub category: Option<String>,
    /// Only complaints owned by or assigned to this account.
    pub party: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<ComplaintFilter, Error> {
        let mut filter = ComplaintFilter::default();
        if let Some(raw) = non_blank(self.status) {
            let status = parse_status(&raw)?;
            filter = filter.with_status(status);
        }
        if let Some(raw) = non_blank(self.category) {
            let category = CategoryId::new(&raw)
                .map_err(|_| Error::invalid_request("category must not be blank"))?;
            filter = filter.with_category(category);
        }
        if let Some(raw) = non_blank(self.party) {
            let party = PrincipalId::new(raw)
                .map_err(|err| Error::invalid_request(format!("party: {err}")))?;
            filter = filter.with_party(party);
        }
        Ok(filter)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn parse_status(raw: &str) -> Result<ComplaintStatus, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("unknown status: {raw}")).with_details(json!({
            "field": "status",
            "allowed": ComplaintStatus::ALL.map(ComplaintStatus::as_str),
        }))
    })
}

fn complaint_id(raw: String) -> Result<ComplaintId, Error> {
    ComplaintId::new(raw).map_err(|_| Error::invalid_request("complaint id must not be blank"))
}

/// List complaints visible to the caller.
///
/// Users see their own complaints; admins see all of them.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(ListQuery),
    responses(
        (status = 200, description = "Complaints", body = [ComplaintBody]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Data store unreachable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<ComplaintBody>>> {
    let filter = query.into_inner().into_filter()?;
    let mut identity = state.identity(session);
    let principal = identity.require_principal()?.clone();
    let listed = state.lifecycle.list_filtered(&principal, &filter).await;
    let listed = identity.settle(listed)?;
    Ok(web::Json(listed.iter().map(ComplaintBody::from).collect()))
}

/// File a new complaint.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintRequest,
    responses(
        (status = 201, description = "Complaint created", body = ComplaintBody),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Admins cannot submit", body = ErrorSchema),
        (status = 503, description = "Data store unreachable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "submitComplaint"
)]
#[post("/complaints")]
pub async fn submit_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::UserOnly)?;
    let created = state
        .lifecycle
        .submit(&principal, payload.into_inner().into())
        .await;
    let created = identity.settle(created)?;
    Ok(HttpResponse::Created().json(ComplaintBody::from(&created)))
}

/// Assign a complaint to an account.
#[utoipa::path(
    patch,
    path = "/api/v1/complaints/{id}/assign",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Complaint assigned", body = ComplaintBody),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "Complaint or assignee not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "assignComplaint"
)]
#[patch("/complaints/{id}/assign")]
pub async fn assign_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AssignRequest>,
) -> ApiResult<web::Json<ComplaintBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = complaint_id(path.into_inner())?;
    let assignee = PrincipalId::new(payload.into_inner().assigned_to)
        .map_err(|err| Error::invalid_request(format!("assignedTo: {err}")))?;
    let updated = state.lifecycle.assign(&principal, &id, &assignee).await;
    let updated = identity.settle(updated)?;
    Ok(web::Json(ComplaintBody::from(&updated)))
}

/// Move a complaint to a new status.
///
/// `in_progress` starts work, `resolved` records the notes and `rejected`
/// closes without them. `pending` is never a valid target.
#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ComplaintBody),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 403, description = "Admins only or transition not allowed", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaintStatus"
)]
#[put("/complaints/{id}")]
pub async fn update_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<ComplaintBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = complaint_id(path.into_inner())?;
    let StatusRequest {
        status,
        resolution_notes,
    } = payload.into_inner();
    let updated = match parse_status(&status)? {
        ComplaintStatus::InProgress => state.lifecycle.start(&principal, &id).await,
        ComplaintStatus::Resolved => {
            let notes = resolution_notes.unwrap_or_default();
            state.lifecycle.resolve(&principal, &id, &notes).await
        }
        ComplaintStatus::Rejected => state.lifecycle.reject(&principal, &id).await,
        ComplaintStatus::Pending => Err(Error::forbidden("complaints cannot return to pending")
            .with_details(json!({ "requested": "pending" }))),
    };
    let updated = identity.settle(updated)?;
    Ok(web::Json(ComplaintBody::from(&updated)))
}

/// Remove a complaint permanently.
#[utoipa::path(
    delete,
    path = "/api/v1/complaints/{id}",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint deleted", body = DeletedBody),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "deleteComplaint"
)]
#[delete("/complaints/{id}")]
pub async fn delete_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = complaint_id(path.into_inner())?;
    let removed = state.lifecycle.delete(&principal, &id).await;
    let removed = identity.settle(removed)?;
    Ok(web::Json(DeletedBody {
        id: removed.to_string(),
    }))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
