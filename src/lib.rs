//! # Push Relay Library
//!
//! Accepts notification requests over HTTP, authenticates the caller with
//! either the global token or a scoped per-user token, and forwards a
//! template message upstream with a cached access credential.
//!
//! Modules:
//! - `config`: service configuration, loading and validation
//! - `store`: key-value store adapter (memory, Redis)
//! - `cache`: upstream credential cache with refresh
//! - `upstream`: upstream API client and wire types
//! - `dispatch`: message building and send with one credential retry
//! - `auth`: request authentication and scoped token generation
//! - `registry`: scoped token CRUD
//! - `server`: axum routes

pub mod auth;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod observability;
pub mod registry;
pub mod server;
pub mod store;
pub mod upstream;
pub mod utils;
#[cfg(test)]
pub mod tests;


pub use crate::config::settings::ServiceConfig;
pub use crate::errors::{ConfigurationError, RelayError};
