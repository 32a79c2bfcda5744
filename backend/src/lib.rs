//! Complaint desk backend library.
//!
//! A session-holding service in front of a remote complaint store: it
//! authenticates principals, gates routes by role, validates complaints and
//! drives their lifecycle.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
