//! Project registry models and DTOs.

use assetforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// Relative `/uploads/...` path; resolved to an absolute URL by the API.
    pub cover_image: Option<String>,
    /// Nulled if the owning user is deleted.
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project row with the owner summary joined in for detail/list responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithOwner {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub cover_image: Option<String>,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Resolved owner username (from JOIN); `None` if ownerless.
    pub owner_username: Option<String>,
    /// Resolved owner email (from JOIN); `None` if ownerless.
    pub owner_email: Option<String>,
}

/// Compact shape used when listing a user's project memberships.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// Compact member shape used when listing a project's users.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// DTO for creating a project. The owner is auto-added as sole member.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub cover_image: Option<String>,
}

/// DTO for a partial project patch. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub cover_image: Option<String>,
}
