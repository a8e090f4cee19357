//! Asset catalog models and DTOs.

use assetforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table.
///
/// `metadata` holds the type-specific variant document (tagged with
/// `"type"`), validated by `assetforge_core::asset_meta` before insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_path: String,
    pub screenshot_path: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Asset row with owner and project summaries joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetWithRefs {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_path: String,
    pub screenshot_path: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Resolved owner username (from JOIN).
    pub owner_username: Option<String>,
    /// Resolved owner email (from JOIN).
    pub owner_email: Option<String>,
    /// Resolved project name (from JOIN).
    pub project_name: Option<String>,
}

/// A row from the `asset_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetVersion {
    pub id: DbId,
    pub asset_id: DbId,
    pub version_number: i32,
    pub file_path: String,
    pub created_at: Timestamp,
}

/// DTO for creating an asset. Creation seeds version 1 with `file_path`.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    pub owner_id: DbId,
    pub project_id: DbId,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_path: String,
    pub screenshot_path: Option<String>,
    pub metadata: serde_json::Value,
}

/// DTO for a partial asset patch. `metadata`, when present, is the merged
/// and re-validated variant document, not the raw client patch.
#[derive(Debug, Clone, Default)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<serde_json::Value>,
}

/// Optional filters for asset listing. All supplied filters must match;
/// `tags` requires every listed tag to be present on the asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    pub kind: Option<String>,
    pub tags: Option<Vec<String>>,
    pub project_id: Option<DbId>,
    pub owner_id: Option<DbId>,
}
