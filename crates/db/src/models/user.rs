//! User directory models and DTOs.

use assetforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Argon2id PHC hash. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Relative `/uploads/...` path; the API resolves it to an absolute URL.
    pub profile_photo: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public listing shape: sensitive columns are never selected.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub profile_photo: String,
}

/// DTO for registering a new user. The photo path is the stored relative
/// path of the uploaded profile photo.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_photo: String,
}

/// DTO for a partial user patch. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub profile_photo: Option<String>,
}
