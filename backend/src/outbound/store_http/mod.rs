//! Data-store outbound adapter over HTTP/JSON.
//!
//! This module provides a thin reqwest implementation of the complaint,
//! category, user directory and authentication ports.

mod client;
mod dto;

pub use client::StoreHttpClient;
