//! Repository for the `assets` table.
//!
//! The project<->asset relation is `assets.project_id` alone; a project's
//! asset list is derived by query, never stored as a second list.

use sqlx::PgPool;

use assetforge_core::types::DbId;

use crate::models::asset::{Asset, AssetFilter, AssetWithRefs, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, owner_id, project_id, kind, name, description, tags, \
    file_path, screenshot_path, metadata, created_at, updated_at";

/// Asset columns plus joined owner/project summaries.
const REF_COLUMNS: &str = "\
    a.id, a.owner_id, a.project_id, a.kind, a.name, a.description, a.tags, \
    a.file_path, a.screenshot_path, a.metadata, a.created_at, a.updated_at, \
    u.username AS owner_username, u.email AS owner_email, \
    p.name AS project_name";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset and seed its version history with version 1
    /// pointing at the uploaded file. Both writes happen in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO assets
                (owner_id, project_id, kind, name, description, tags,
                 file_path, screenshot_path, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(input.owner_id)
            .bind(input.project_id)
            .bind(&input.kind)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(&input.file_path)
            .bind(&input.screenshot_path)
            .bind(&input.metadata)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO asset_versions (asset_id, version_number, file_path)
             VALUES ($1, 1, $2)",
        )
        .bind(asset.id)
        .bind(&input.file_path)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(asset)
    }

    /// Find an asset by internal ID, with owner/project summaries joined.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssetWithRefs>, sqlx::Error> {
        let query = format!(
            "SELECT {REF_COLUMNS} FROM assets a
             LEFT JOIN users u ON u.id = a.owner_id
             LEFT JOIN projects p ON p.id = a.project_id
             WHERE a.id = $1"
        );
        sqlx::query_as::<_, AssetWithRefs>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset row without joins. Used by delete flows that only
    /// need the file references.
    pub async fn find_row(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets matching the given filters. The tag filter requires
    /// every listed tag to be present (`@>` on `text[]`).
    pub async fn search(
        pool: &PgPool,
        filter: &AssetFilter,
    ) -> Result<Vec<AssetWithRefs>, sqlx::Error> {
        let query = format!(
            "SELECT {REF_COLUMNS} FROM assets a
             LEFT JOIN users u ON u.id = a.owner_id
             LEFT JOIN projects p ON p.id = a.project_id
             WHERE ($1::text IS NULL OR a.kind = $1)
               AND ($2::text[] IS NULL OR a.tags @> $2)
               AND ($3::bigint IS NULL OR a.project_id = $3)
               AND ($4::bigint IS NULL OR a.owner_id = $4)
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, AssetWithRefs>(&query)
            .bind(&filter.kind)
            .bind(&filter.tags)
            .bind(filter.project_id)
            .bind(filter.owner_id)
            .fetch_all(pool)
            .await
    }

    /// List the assets a user can reach: assets they own, plus assets
    /// in projects they are a member of.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AssetWithRefs>, sqlx::Error> {
        let query = format!(
            "SELECT {REF_COLUMNS} FROM assets a
             LEFT JOIN users u ON u.id = a.owner_id
             LEFT JOIN projects p ON p.id = a.project_id
             WHERE a.owner_id = $1
                OR a.project_id IN
                   (SELECT project_id FROM project_members WHERE user_id = $1)
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, AssetWithRefs>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                tags = COALESCE($4, tags),
                metadata = COALESCE($5, metadata),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(&input.metadata)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset row. Versions and favorite entries cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether an asset row exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar("SELECT id FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Attach an asset to a project by setting its `project_id`.
    /// Returns `true` if the asset row exists.
    pub async fn set_project(
        pool: &PgPool,
        asset_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE assets SET project_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(asset_id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Detach an asset from a project, but only if it is currently in
    /// that project. Returns `true` if a row was updated.
    pub async fn clear_project(
        pool: &PgPool,
        asset_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assets SET project_id = NULL, updated_at = NOW()
             WHERE id = $1 AND project_id = $2",
        )
        .bind(asset_id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
