//! Repository for the `asset_versions` table.
//!
//! Version numbers are caller-supplied but unique per asset; the
//! `uq_asset_versions_number` constraint turns a duplicate into a
//! conflict error at the API boundary.

use sqlx::PgPool;

use assetforge_core::types::DbId;

use crate::models::asset::AssetVersion;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, version_number, file_path, created_at";

/// Provides operations on an asset's version history.
pub struct VersionRepo;

impl VersionRepo {
    /// List an asset's versions ordered by version number ascending.
    pub async fn list(pool: &PgPool, asset_id: DbId) -> Result<Vec<AssetVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_versions
             WHERE asset_id = $1
             ORDER BY version_number"
        );
        sqlx::query_as::<_, AssetVersion>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// List versions for a whole set of assets in one round-trip.
    /// Used to assemble list responses without N+1 queries.
    pub async fn list_for_assets(
        pool: &PgPool,
        asset_ids: &[DbId],
    ) -> Result<Vec<AssetVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_versions
             WHERE asset_id = ANY($1)
             ORDER BY asset_id, version_number"
        );
        sqlx::query_as::<_, AssetVersion>(&query)
            .bind(asset_ids)
            .fetch_all(pool)
            .await
    }

    /// Append a version and refresh the asset's `updated_at`, in one
    /// transaction. A duplicate version number violates
    /// `uq_asset_versions_number`.
    pub async fn add(
        pool: &PgPool,
        asset_id: DbId,
        version_number: i32,
        file_path: &str,
    ) -> Result<AssetVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO asset_versions (asset_id, version_number, file_path)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, AssetVersion>(&query)
            .bind(asset_id)
            .bind(version_number)
            .bind(file_path)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE assets SET updated_at = NOW() WHERE id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// Delete the version with the given number. Returns the number of
    /// rows removed (0 is a silent no-op at the API level).
    pub async fn delete_by_number(
        pool: &PgPool,
        asset_id: DbId,
        version_number: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM asset_versions WHERE asset_id = $1 AND version_number = $2",
        )
        .bind(asset_id)
        .bind(version_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
