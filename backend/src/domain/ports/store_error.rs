//! Error shared by every port backed by the remote data store.

use super::define_port_error;

define_port_error! {
    /// Errors raised by data-store adapters.
    ///
    /// `Transport` covers network failures, timeouts and server faults and is
    /// kept distinct from the domain refusals so callers can offer a manual
    /// retry.
    pub enum StoreError {
        /// The store could not be reached or failed internally.
        Transport { message: String } => "data store unreachable: {message}",
        /// The bearer credential was missing, invalid or expired.
        Unauthorized { message: String } => "data store rejected the credential: {message}",
        /// The credential is valid but may not perform the action.
        Forbidden { message: String } => "data store denied the action: {message}",
        /// A referenced record does not exist.
        NotFound { message: String } => "not found: {message}",
        /// The payload was refused, e.g. a duplicate email.
        Rejected { message: String } => "{message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "data store response could not be decoded: {message}",
    }
}
