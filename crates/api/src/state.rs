use std::sync::Arc;

use crate::config::ServerConfig;
use crate::files::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: assetforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upload directory handle for storing and removing asset files.
    pub files: Arc<UploadStore>,
}
