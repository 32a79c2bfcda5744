//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Missing, bad or expired credentials.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in, but the role does not allow it.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The data store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "admin-only routes are not available to this account")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "4b0b0f47-0b5e-4f6c-9d8e-2f6c8c1e0d51")]
    trace_id: Option<String>,
    /// Field violations or a `redirect` hint.
    details: Option<serde_json::Value>,
}
