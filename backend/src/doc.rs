//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health checks,
//! the domain error wrappers from [`crate::inbound::http::schemas`] and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::access::{AccessResponse, NavLink};
use crate::inbound::http::admin::StatsBody;
use crate::inbound::http::auth::{AccountBody, LoginRequest, RegisterRequest, SessionResponse};
use crate::inbound::http::categories::{CategoryBody, CategoryRequest};
use crate::inbound::http::complaints::{
    AssignRequest, ComplaintBody, DeletedBody, StatusRequest, SubmitComplaintRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Complaint desk API",
        description = "Utility complaint intake and triage with role-based access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::access::check_access,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::submit_complaint,
        crate::inbound::http::complaints::assign_complaint,
        crate::inbound::http::complaints::update_status,
        crate::inbound::http::complaints::delete_complaint,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::complaint_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        AccountBody,
        SessionResponse,
        AccessResponse,
        NavLink,
        ComplaintBody,
        SubmitComplaintRequest,
        AssignRequest,
        StatusRequest,
        DeletedBody,
        CategoryBody,
        CategoryRequest,
        StatsBody,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up and session state"),
        (name = "access", description = "Route gating for client navigation"),
        (name = "complaints", description = "Complaint intake and lifecycle"),
        (name = "categories", description = "Complaint categories"),
        (name = "admin", description = "Account directory and dashboard totals"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(ERROR_SCHEMA_NAME).expect("Error schema") {
            RefOr::T(Schema::Object(obj)) => {
                for field in ["code", "message", "traceId", "details"] {
                    assert!(obj.properties.contains_key(field), "missing {field}");
                }
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/access/{routeClass}")]
    #[case("/api/v1/complaints")]
    #[case("/api/v1/complaints/{id}")]
    #[case("/api/v1/complaints/{id}/assign")]
    #[case("/api/v1/categories/{id}")]
    #[case("/api/v1/admin/complaint-stats")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
