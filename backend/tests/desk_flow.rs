//! End-to-end flows through the assembled app over the in-memory store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use complaint_desk::Trace;
use complaint_desk::domain::TRACE_ID_HEADER;
use complaint_desk::inbound::http::configure_api;
use complaint_desk::inbound::http::state::{HttpState, HttpStatePorts};
use complaint_desk::outbound::MemoryStore;
use complaint_desk::outbound::memory::{SEED_ADMIN_EMAIL, SEED_PASSWORD};

async fn desk() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let store = Arc::new(MemoryStore::seeded().expect("seed data is valid"));
    let state = web::Data::new(HttpState::new(HttpStatePorts::uniform(store)));
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

async fn json_of(res: ServiceResponse) -> Value {
    test::read_body_json(res).await
}

#[actix_web::test]
async fn complaint_travels_from_submission_to_resolution() {
    let app = desk().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": "Ada Obi",
                "email": "ada@example.com",
                "password": "secret1"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let ada = session_cookie(&res);
    let body = json_of(res).await;
    assert_eq!(body["principal"]["role"], "user");
    let ada_id = body["principal"]["id"].as_str().expect("id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/categories").to_request(),
    )
    .await;
    let categories = json_of(res).await;
    let outage = categories[0]["id"].as_str().expect("category id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/complaints")
            .cookie(ada.clone())
            .set_json(json!({
                "title": "  No power on Marina Road ",
                "description": "Power has been out since Monday",
                "category": outage,
                "accountNumber": "0123456789",
                "phoneNumber": "08030000000",
                "address": "12 Marina Road",
                "region": ""
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = json_of(res).await;
    assert_eq!(created["title"], "No power on Marina Road");
    assert!(created["region"].is_null());
    let id = created["id"].as_str().expect("complaint id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": SEED_ADMIN_EMAIL, "password": SEED_PASSWORD }))
            .to_request(),
    )
    .await;
    let admin = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/complaints?party={ada_id}&status=pending"))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    let listed = json_of(res).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    for (status, notes) in [("in_progress", None), ("resolved", Some("Fuse replaced"))] {
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .cookie(admin.clone())
                .set_json(json!({ "status": status, "resolutionNotes": notes }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK, "moving to {status}");
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/complaint-stats")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(
        json_of(res).await,
        json!({ "total": 1, "pending": 0, "resolved": 1, "rejected": 0 })
    );

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/complaints")
            .cookie(ada)
            .to_request(),
    )
    .await;
    let mine = json_of(res).await;
    assert_eq!(mine[0]["status"], "resolved");
    assert_eq!(mine[0]["resolutionNotes"], "Fuse replaced");
}

#[actix_web::test]
async fn revoked_credentials_end_the_session() {
    let app = desk().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": "Short Lived",
                "email": "short@example.com",
                "password": "secret1"
            }))
            .to_request(),
    )
    .await;
    let user = session_cookie(&res);
    let user_id = json_of(res).await["principal"]["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": SEED_ADMIN_EMAIL, "password": SEED_PASSWORD }))
            .to_request(),
    )
    .await;
    let admin = session_cookie(&res);
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/users/{user_id}"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/complaints")
            .cookie(user)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let cleared = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    let body = json_of(res).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["home"], "/login");
}

#[actix_web::test]
async fn refusals_carry_trace_ids_and_redirects() {
    let app = desk().await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/complaints")
            .set_json(json!({ "title": "x", "description": "y", "category": "z" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body = json_of(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], header.as_str());
    assert_eq!(body["details"]["redirect"], "/login");
}
