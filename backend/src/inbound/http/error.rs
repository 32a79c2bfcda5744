//! Actix rendering of domain errors.
//!
//! Each [`ErrorCode`] maps to one status. Bodies keep the domain JSON shape
//! and the `trace-id` header repeats the body's `traceId`. Internal and
//! data-store outage messages are logged and replaced before they reach the
//! browser, since both can carry store URLs or payload fragments.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for complaint desk handlers.
pub type ApiResult<T> = Result<T, Error>;

pub(crate) const INTERNAL_MESSAGE: &str = "Internal server error";
pub(crate) const STORE_UNAVAILABLE_MESSAGE: &str =
    "The complaint service is temporarily unavailable; please try again";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Payload safe to send to the browser for `error`.
fn client_view(error: &Error) -> Error {
    let trace_id = error.trace_id().unwrap_or("-");
    let replacement = match error.code() {
        ErrorCode::InternalError => {
            error!(message = error.message(), trace_id, "internal error returned to client");
            Error::internal(INTERNAL_MESSAGE)
        }
        ErrorCode::ServiceUnavailable => {
            warn!(message = error.message(), trace_id, "data store outage returned to client");
            Error::service_unavailable(STORE_UNAVAILABLE_MESSAGE)
        }
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => replacement.with_trace_id(id.to_owned()),
        None => replacement,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}
