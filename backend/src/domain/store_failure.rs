//! Translation of data-store port errors into domain errors.

use tracing::warn;

use super::Error;
use super::ports::StoreError;

/// Map a [`StoreError`] onto the domain taxonomy.
///
/// Transport failures stay distinct from refusals so callers can offer a
/// manual retry; undecodable responses surface as internal errors.
pub(crate) fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Transport { message } => {
            warn!(%message, "data store unreachable");
            Error::service_unavailable(format!("data store unavailable: {message}"))
        }
        StoreError::Unauthorized { message } => Error::unauthorized(message),
        StoreError::Forbidden { message } => Error::forbidden(message),
        StoreError::NotFound { message } => Error::not_found(message),
        StoreError::Rejected { message } => Error::invalid_request(message),
        StoreError::Decode { message } => {
            Error::internal(format!("data store response malformed: {message}"))
        }
    }
}
