//! Category handlers. Listing is public; changes are admin-only.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, CategoryDraft, CategoryId, Error, RouteClass};
use crate::inbound::http::ApiResult;
use crate::inbound::http::complaints::DeletedBody;
use crate::inbound::http::gate::admit;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    pub id: String,
    #[schema(example = "Outage")]
    pub name: String,
    pub description: Option<String>,
}

impl From<&Category> for CategoryBody {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_owned(),
            description: category.description().map(str::to_owned),
        }
    }
}

/// Body for creating or replacing a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    fn into_draft(self) -> Result<CategoryDraft, Error> {
        CategoryDraft::try_from_parts(&self.name, self.description.as_deref()).map_err(Error::from)
    }
}

fn category_id(raw: String) -> Result<CategoryId, Error> {
    CategoryId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryBody]),
        (status = 503, description = "Data store unreachable", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CategoryBody>>> {
    let categories = state.categories.list().await?;
    Ok(web::Json(categories.iter().map(CategoryBody::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryBody),
        (status = 400, description = "Invalid or duplicate name", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let draft = payload.into_inner().into_draft()?;
    let created = state.categories.create(&principal, draft).await;
    let created = identity.settle(created)?;
    Ok(HttpResponse::Created().json(CategoryBody::from(&created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryBody),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "Category not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[put("/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = category_id(path.into_inner())?;
    let draft = payload.into_inner().into_draft()?;
    let updated = state.categories.update(&principal, &id, draft).await;
    let updated = identity.settle(updated)?;
    Ok(web::Json(CategoryBody::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category deleted", body = DeletedBody),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "Category not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = category_id(path.into_inner())?;
    let removed = state.categories.delete(&principal, &id).await;
    let removed = identity.settle(removed)?;
    Ok(web::Json(DeletedBody {
        id: removed.to_string(),
    }))
}
