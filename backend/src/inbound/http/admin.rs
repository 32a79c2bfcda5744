//! Admin dashboard handlers.
//!
//! ```text
//! GET /api/v1/admin/users
//! DELETE /api/v1/admin/users/{id}
//! GET /api/v1/admin/complaint-stats
//! ```

use actix_web::{delete, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ComplaintStats, Error, PrincipalId, RouteClass};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AccountBody;
use crate::inbound::http::complaints::DeletedBody;
use crate::inbound::http::gate::admit;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Complaint totals; `in_progress` complaints count toward `total` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    pub total: u64,
    pub pending: u64,
    pub resolved: u64,
    pub rejected: u64,
}

impl From<ComplaintStats> for StatsBody {
    fn from(stats: ComplaintStats) -> Self {
        Self {
            total: stats.total,
            pending: stats.pending,
            resolved: stats.resolved,
            rejected: stats.rejected,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Registered accounts", body = [AccountBody]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountBody>>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let accounts = state.accounts.list(&principal).await;
    let accounts = identity.settle(accounts)?;
    Ok(web::Json(accounts.iter().map(AccountBody::from).collect()))
}

/// Remove an account. Administrators cannot remove themselves.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted", body = DeletedBody),
        (status = 403, description = "Admins only, or own account", body = ErrorSchema),
        (status = 404, description = "Account not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedBody>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let id = PrincipalId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let removed = state.accounts.delete(&principal, &id).await;
    let removed = identity.settle(removed)?;
    Ok(web::Json(DeletedBody {
        id: removed.to_string(),
    }))
}

/// Complaint totals for the dashboard; `null` when the store cannot count.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaint-stats",
    responses(
        (status = 200, description = "Totals, or null when unavailable", body = Option<StatsBody>),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "complaintStats"
)]
#[get("/admin/complaint-stats")]
pub async fn complaint_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<StatsBody>>> {
    let mut identity = state.identity(session);
    let principal = admit(&identity, RouteClass::AdminOnly)?;
    let stats = state.lifecycle.stats(&principal).await;
    let stats = identity.settle(stats)?;
    Ok(web::Json(stats.map(StatsBody::from)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{
        AuthGateway, CategoryStore, ComplaintStore, MockComplaintStore, StoreError,
    };
    use crate::inbound::http::auth::login;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{memory_state, sign_in, test_app};
    use crate::outbound::memory::{MemoryStore, SEED_ADMIN_EMAIL, SEED_USER_EMAIL};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(login)
            .service(list_users)
            .service(delete_user)
            .service(complaint_stats);
    }

    #[actix_web::test]
    async fn admin_lists_accounts() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let admin = sign_in(&app, SEED_ADMIN_EMAIL).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/users")
                .cookie(admin)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<AccountBody> = actix_test::read_body_json(res).await;
        let roles: Vec<&str> = body.iter().map(|a| a.role.as_str()).collect();
        assert_eq!(roles, ["admin", "user"]);
    }

    #[actix_web::test]
    async fn anonymous_admin_routes_redirect_to_login() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/users")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["redirect"], "/login");
    }

    #[actix_web::test]
    async fn deleted_account_leaves_listing() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let admin = sign_in(&app, SEED_ADMIN_EMAIL).await;
        let list = || {
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/users")
                .cookie(admin.clone())
                .to_request()
        };

        let res = actix_test::call_service(&app, list()).await;
        let accounts: Vec<AccountBody> = actix_test::read_body_json(res).await;
        let target = accounts
            .iter()
            .find(|a| a.email == SEED_USER_EMAIL)
            .expect("seeded user listed");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/users/{}", target.id))
                .cookie(admin.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: DeletedBody = actix_test::read_body_json(res).await;
        assert_eq!(body.id, target.id);

        let res = actix_test::call_service(&app, list()).await;
        let remaining: Vec<AccountBody> = actix_test::read_body_json(res).await;
        assert_eq!(remaining.len(), 1);
    }

    #[actix_web::test]
    async fn admin_cannot_delete_self() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let admin = sign_in(&app, SEED_ADMIN_EMAIL).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/users")
                .cookie(admin.clone())
                .to_request(),
        )
        .await;
        let accounts: Vec<AccountBody> = actix_test::read_body_json(res).await;
        let me = accounts
            .iter()
            .find(|a| a.email == SEED_ADMIN_EMAIL)
            .expect("seeded admin listed");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/users/{}", me.id))
                .cookie(admin)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn stats_count_by_status() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let admin = sign_in(&app, SEED_ADMIN_EMAIL).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/complaint-stats")
                .cookie(admin)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Option<StatsBody> = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            Some(StatsBody {
                total: 0,
                pending: 0,
                resolved: 0,
                rejected: 0,
            })
        );
    }

    #[actix_web::test]
    async fn failing_stats_render_as_null() {
        let store = Arc::new(MemoryStore::seeded().expect("seed data is valid"));
        let mut complaints = MockComplaintStore::new();
        complaints
            .expect_complaint_stats()
            .returning(|_| Err(StoreError::transport("store timed out")));
        let auth: Arc<dyn AuthGateway> = store.clone();
        let categories: Arc<dyn CategoryStore> = store.clone();
        let complaints: Arc<dyn ComplaintStore> = Arc::new(complaints);
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            auth,
            complaints,
            categories,
            users: store,
        }));
        let app = actix_test::init_service(test_app(state, configure)).await;
        let admin = sign_in(&app, SEED_ADMIN_EMAIL).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/complaint-stats")
                .cookie(admin)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body.is_null());
    }
}
