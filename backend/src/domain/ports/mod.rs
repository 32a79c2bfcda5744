//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod category_store;
mod complaint_store;
mod session_vault;
mod store_error;
mod user_directory;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::AuthGateway;
#[cfg(test)]
pub use category_store::MockCategoryStore;
pub use category_store::CategoryStore;
#[cfg(test)]
pub use complaint_store::MockComplaintStore;
pub use complaint_store::ComplaintStore;
#[cfg(test)]
pub use session_vault::MockSessionVault;
pub use session_vault::{EphemeralSessionVault, PersistedSession, SessionVault, VaultError};
pub use store_error::StoreError;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
