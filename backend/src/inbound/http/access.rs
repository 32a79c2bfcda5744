//! Client-side navigation support.
//!
//! Exposes the same gate the server applies so the UI can route without
//! duplicating the rules.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Decision, Error, NavEntry, RouteClass, UnknownRouteClass, authorize, navigation_for,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Navigation link the current principal may follow.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    #[schema(example = "/dashboard")]
    pub path: String,
    #[schema(example = "Dashboard")]
    pub label: String,
}

impl From<NavEntry> for NavLink {
    fn from(entry: NavEntry) -> Self {
        Self {
            path: entry.path.to_owned(),
            label: entry.label.to_owned(),
        }
    }
}

/// Gate decision for one route class.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    #[schema(value_type = String, example = "redirect_to_login")]
    pub decision: Decision,
    pub allowed: bool,
    #[schema(example = "/login")]
    pub location: Option<String>,
    pub navigation: Vec<NavLink>,
}

/// Decide whether the caller may enter routes of `routeClass`.
#[utoipa::path(
    get,
    path = "/api/v1/access/{routeClass}",
    params(("routeClass" = String, Path, description = "public | user-only | admin-only")),
    responses(
        (status = 200, description = "Gate decision", body = AccessResponse),
        (status = 400, description = "Unknown route class", body = ErrorSchema)
    ),
    tags = ["access"],
    operation_id = "checkAccess",
    security([])
)]
#[get("/access/{routeClass}")]
pub async fn check_access(
    state: web::Data<HttpState>,
    session: SessionContext,
    route_class: web::Path<String>,
) -> ApiResult<web::Json<AccessResponse>> {
    let raw = route_class.into_inner();
    let route: RouteClass = raw.parse().map_err(|err: UnknownRouteClass| {
        Error::invalid_request(err.to_string()).with_details(json!({ "routeClass": raw }))
    })?;
    let identity = state.identity(session);
    let decision = authorize(identity.principal(), route);
    Ok(web::Json(AccessResponse {
        decision,
        allowed: decision.is_allowed(),
        location: decision.location().map(str::to_owned),
        navigation: navigation_for(identity.principal())
            .into_iter()
            .map(NavLink::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::auth::login;
    use crate::inbound::http::test_utils::{memory_state, sign_in, test_app};
    use crate::outbound::memory::{SEED_ADMIN_EMAIL, SEED_USER_EMAIL};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(login).service(check_access);
    }

    #[rstest]
    #[case(None, "admin-only", "redirect_to_login", Some("/login"))]
    #[case(None, "public", "allow", None)]
    #[case(Some(SEED_USER_EMAIL), "admin-only", "redirect_to_user_home", Some("/dashboard"))]
    #[case(Some(SEED_ADMIN_EMAIL), "user-only", "redirect_to_admin_home", Some("/admin"))]
    #[case(Some(SEED_ADMIN_EMAIL), "admin-only", "allow", None)]
    #[actix_web::test]
    async fn reports_decisions(
        #[case] email: Option<&str>,
        #[case] route: &str,
        #[case] decision: &str,
        #[case] location: Option<&str>,
    ) {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let mut request = actix_test::TestRequest::get().uri(&format!("/api/v1/access/{route}"));
        if let Some(email) = email {
            request = request.cookie(sign_in(&app, email).await);
        }
        let res = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["decision"], decision);
        assert_eq!(body["location"].as_str(), location);
    }

    #[actix_web::test]
    async fn navigation_follows_role() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let cookie = sign_in(&app, SEED_ADMIN_EMAIL).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/access/public")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: AccessResponse = actix_test::read_body_json(res).await;
        let paths: Vec<&str> = body.navigation.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, ["/admin"]);
    }

    #[actix_web::test]
    async fn unknown_route_class_is_invalid() {
        let app = actix_test::init_service(test_app(memory_state(), configure)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/access/superuser")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
