//! Outbound adapters implementing domain ports for the data store.
//!
//! - **store_http**: reqwest client for the remote data store
//! - **memory**: in-process store for local development and tests
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no lifecycle rules.

pub mod memory;
pub mod store_http;

pub use memory::MemoryStore;
pub use store_http::StoreHttpClient;
