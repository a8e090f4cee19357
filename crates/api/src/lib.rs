//! Assetforge API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! upload store) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod base_url;
pub mod config;
pub mod error;
pub mod files;
pub mod handlers;
pub mod multipart;
pub mod router;
pub mod routes;
pub mod state;
