//! Domain primitives, rules and services.
//!
//! Purpose: hold the complaint lifecycle and access-control model free of
//! any transport. Inbound adapters call the services; outbound adapters
//! implement the [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Principal, Account, Role: identities and access classes.
//! - Complaint, ComplaintStatus, ComplaintSubmission: the central entity.
//! - authorize, RouteClass, Decision: route gating.
//! - ComplaintFilter, ComplaintBoard: pure list filtering.
//! - IdentitySession, ComplaintLifecycle, CategoryCatalogue,
//!   AccountDirectory: services.

pub mod access;
pub mod admin;
pub mod auth;
pub mod category;
pub mod complaint;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod ports;
pub mod principal;
pub mod session;
pub mod stats;
mod store_failure;
pub mod trace_id;
pub mod validation;

pub use self::access::{
    ADMIN_HOME_PATH, Decision, LOGIN_PATH, NavEntry, REGISTER_PATH, RouteClass, USER_HOME_PATH,
    UnknownRouteClass, authorize, can_read, landing, navigation_for, require_role,
    scope_to_reader,
};
pub use self::admin::{AccountDirectory, CategoryCatalogue};
pub use self::auth::{LoginCredentials, MIN_PASSWORD_LEN, Registration, SessionGrant};
pub use self::category::{Category, CategoryDraft, CategoryId, EmptyCategoryId};
pub use self::complaint::{
    Complaint, ComplaintDetails, ComplaintId, ComplaintRecord, ComplaintStatus,
    ComplaintSubmission, EmptyComplaintId, MIN_DESCRIPTION_LEN, MIN_TITLE_LEN, NewComplaint,
    StatusChange, UnknownStatus,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{ComplaintBoard, ComplaintFilter};
pub use self::lifecycle::ComplaintLifecycle;
pub use self::principal::{
    Account, AuthToken, EmailAddress, Principal, PrincipalId, PrincipalValidationError, Role,
};
pub use self::session::IdentitySession;
pub use self::stats::ComplaintStats;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldViolation, FieldViolations};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use complaint_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
