//! Sign-in, sign-up and session handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"user@complaints.local","password":"password"}
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SessionVault;
use crate::domain::{Account, IdentitySession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "user@complaints.local")]
    pub email: String,
    pub password: String,
}

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Obi")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
}

impl From<&Account> for AccountBody {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            name: account.name().to_owned(),
            email: account.email().to_string(),
            role: account.role().as_str().to_owned(),
        }
    }
}

/// Current session state and where the UI should land.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub principal: Option<AccountBody>,
    #[schema(example = "/dashboard")]
    pub home: String,
}

impl SessionResponse {
    fn from_identity<V: SessionVault>(identity: &IdentitySession<V>) -> Self {
        let principal = identity.principal().map(|p| AccountBody::from(p.account()));
        Self {
            authenticated: principal.is_some(),
            principal,
            home: identity.home().to_owned(),
        }
    }
}

/// Authenticate with the data store and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed credentials", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Data store unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let mut identity = state.identity(session);
    identity.sign_in(&payload.email, &payload.password).await?;
    Ok(web::Json(SessionResponse::from_identity(&identity)))
}

/// Create an account and sign it in.
///
/// Accounts created here always hold the `user` role.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered and signed in", body = SessionResponse),
        (status = 400, description = "Invalid form or email already registered", body = ErrorSchema),
        (status = 503, description = "Data store unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let mut identity = state.identity(session);
    identity
        .sign_up(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok(HttpResponse::Created().json(SessionResponse::from_identity(&identity)))
}

/// Drop the session; succeeds whether or not anyone was signed in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    state.identity(session).sign_out();
    HttpResponse::NoContent().finish()
}

/// Report the signed-in principal, if any.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses((status = 200, description = "Session state", body = SessionResponse)),
    tags = ["auth"],
    operation_id = "currentSession",
    security([])
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<SessionResponse> {
    web::Json(SessionResponse::from_identity(&state.identity(session)))
}
