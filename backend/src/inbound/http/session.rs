//! Cookie-backed session vault.
//!
//! Wraps the Actix session so the domain [`IdentitySession`] can persist its
//! principal snapshot without knowing about cookies.
//!
//! [`IdentitySession`]: crate::domain::IdentitySession

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{PersistedSession, SessionVault, VaultError};

pub(crate) const PRINCIPAL_KEY: &str = "principal";

/// Newtype wrapper exposing the Actix session as a [`SessionVault`].
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

impl SessionVault for SessionContext {
    fn load(&self) -> Result<Option<PersistedSession>, VaultError> {
        self.0
            .get::<PersistedSession>(PRINCIPAL_KEY)
            .map_err(|error| VaultError::read(error.to_string()))
    }

    fn store(&self, session: &PersistedSession) -> Result<(), VaultError> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_KEY, session)
            .map_err(|error| VaultError::write(error.to_string()))
    }

    fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::fixtures::principal;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    async fn load_status(session: SessionContext) -> HttpResponse {
        match session.load() {
            Ok(Some(snapshot)) => HttpResponse::Ok().body(snapshot.id),
            Ok(None) => HttpResponse::NoContent().finish(),
            Err(_) => HttpResponse::BadRequest().finish(),
        }
    }

    #[actix_web::test]
    async fn round_trips_snapshot() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let snapshot =
                            PersistedSession::from_principal(&principal("u1", Role::User));
                        match session.store(&snapshot) {
                            Ok(()) => HttpResponse::Ok().finish(),
                            Err(_) => HttpResponse::InternalServerError().finish(),
                        }
                    }),
                )
                .route("/get", web::get().to(load_status)),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, "u1");
    }

    #[actix_web::test]
    async fn missing_snapshot_loads_as_none() {
        let app = test::init_service(session_test_app().route("/get", web::get().to(load_status)))
            .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn tampered_snapshot_fails_to_load() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(PRINCIPAL_KEY, "not-a-snapshot")
                            .expect("set invalid snapshot");
                        HttpResponse::Ok()
                    }),
                )
                .route("/get", web::get().to(load_status)),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
