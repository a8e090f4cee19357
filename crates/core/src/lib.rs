//! Domain layer for the assetforge backend.
//!
//! Holds the pieces shared by the database and API crates: the error
//! taxonomy, common type aliases, the per-type asset metadata model,
//! and stored-filename generation for uploads.

pub mod asset_meta;
pub mod error;
pub mod types;
pub mod uploads;
