//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};

use crate::Trace;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{MemoryStore, SEED_PASSWORD};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over a freshly seeded in-memory store.
pub fn memory_state() -> web::Data<HttpState> {
    state_over(Arc::new(MemoryStore::seeded().expect("seed data is valid")))
}

/// Handler state sharing `store`, so tests can arrange data directly.
pub fn state_over(store: Arc<MemoryStore>) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(HttpStatePorts::uniform(store)))
}

/// App mounting `configure` under `/api/v1` with session and trace layers.
pub fn test_app<F>(
    state: web::Data<HttpState>,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure),
        )
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Sign in a seeded account through `/api/v1/auth/login`.
///
/// `app` must mount [`crate::inbound::http::auth::login`].
pub async fn sign_in<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({ "email": email, "password": SEED_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "seeded sign-in failed");
    session_cookie(&res)
}
