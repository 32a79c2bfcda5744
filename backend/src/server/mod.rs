//! Server construction and middleware wiring.
//!
//! The session cookie only wraps `/api/v1`; health checks and the debug-only
//! Swagger UI stay cookie-free.

mod config;
pub mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_ports;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

use complaint_desk::Trace;
#[cfg(debug_assertions)]
use complaint_desk::doc::ApiDoc;
use complaint_desk::inbound::http::configure_api;
use complaint_desk::inbound::http::health::{HealthState, live, ready};
use complaint_desk::inbound::http::session_config::SessionSettings;
use complaint_desk::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
/// Matches the lifetime of data store tokens.
const SESSION_TTL_HOURS: i64 = 2;

fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(settings.cookie_secure)
        .cookie_same_site(settings.same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

fn desk_app(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
    session: SessionSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health)
        .app_data(state)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session_middleware(&session))
                .configure(configure_api),
        )
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

#[cfg(feature = "metrics")]
fn prometheus() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("complaint_desk")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Bind the desk to `config.bind_addr` and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        ports,
    } = config;
    let state = web::Data::new(HttpState::new(ports));
    #[cfg(feature = "metrics")]
    let metrics = prometheus()?;

    let app_health = health.clone();
    let server = HttpServer::new(move || {
        let app = desk_app(app_health.clone(), state.clone(), session.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());
        app
    })
    .bind(bind_addr)?
    .run();

    health.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::cookie::{Key, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use complaint_desk::inbound::http::state::HttpStatePorts;
    use complaint_desk::outbound::MemoryStore;

    fn dev_session() -> SessionSettings {
        SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    fn memory_ports() -> HttpStatePorts {
        HttpStatePorts::uniform(Arc::new(MemoryStore::seeded().expect("seed data is valid")))
    }

    #[actix_web::test]
    async fn serves_api_and_health_checks() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let state = web::Data::new(HttpState::new(memory_ports()));
        let app = test::init_service(desk_app(health, state, dev_session())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/auth/session").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("set-cookie").is_none());
    }

    #[actix_web::test]
    async fn bound_server_reports_ready() {
        let health = web::Data::new(HealthState::new());
        let config = ServerConfig::new(
            dev_session(),
            "127.0.0.1:0".parse().expect("loopback address"),
            memory_ports(),
        );

        let server = create_server(health.clone(), config).expect("server binds");
        assert!(health.is_ready());
        drop(server);
    }
}
