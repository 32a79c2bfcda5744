//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every protected handler restores an [`crate::domain::IdentitySession`]
//! from the cookie session, admits the caller through [`gate::admit`] and
//! routes the service result back through `settle` so a rejected credential
//! ends the session.

pub mod access;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod complaints;
pub mod error;
pub mod gate;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Mount every `/api/v1` handler on `cfg`.
///
/// The caller owns the scope and its session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::register)
        .service(auth::logout)
        .service(auth::current_session)
        .service(access::check_access)
        .service(complaints::list_complaints)
        .service(complaints::submit_complaint)
        .service(complaints::assign_complaint)
        .service(complaints::update_status)
        .service(complaints::delete_complaint)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(admin::list_users)
        .service(admin::delete_user)
        .service(admin::complaint_stats);
}
