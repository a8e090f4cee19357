//! Asset catalog handlers.
//!
//! Creation and versioning go through multipart forms (metadata fields
//! plus the binary payload); edits go through a JSON PATCH body. File
//! references come back as absolute URLs built from the request host.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use assetforge_core::asset_meta::{AssetKind, AssetMetadata};
use assetforge_core::error::CoreError;
use assetforge_core::types::{DbId, Timestamp};
use assetforge_db::models::{AssetFilter, AssetVersion, AssetWithRefs, CreateAsset, UpdateAsset};
use assetforge_db::repositories::{AssetRepo, ProjectRepo, UserRepo, VersionRepo};
use assetforge_db::DbPool;

use crate::base_url::RequestBase;
use crate::error::{AppError, AppResult};
use crate::multipart::FormData;
use crate::state::AppState;

/// Query parameters for `GET /api/assets`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListQuery {
    /// Asset type discriminator (`model3d`, `sound`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Comma-separated tag list; all listed tags must be present.
    pub tags: Option<String>,
    pub project_id: Option<DbId>,
    pub owner_id: Option<DbId>,
}

/// Query parameters for `GET /api/assets/subcategories`.
#[derive(Debug, Deserialize)]
pub struct SubcategoryQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// JSON body for `PATCH /api/assets/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Field-merge patch for the type-specific metadata. Keys are merged
    /// into the stored document; the `type` discriminator is immutable.
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Compact owner reference embedded in asset responses.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// Compact project reference embedded in asset responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRef {
    pub id: DbId,
    pub name: String,
}

/// One version entry in an asset response.
#[derive(Debug, Serialize)]
pub struct VersionBody {
    pub version_number: i32,
    pub file_url: String,
    pub timestamp: Timestamp,
}

/// Full asset response shape. The type-specific metadata document is
/// flattened in, so `type` and variant fields appear at the top level.
#[derive(Debug, Serialize)]
pub struct AssetBody {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(flatten)]
    pub metadata: serde_json::Value,
    pub owner: Option<OwnerSummary>,
    pub project: Option<ProjectRef>,
    pub versions: Vec<VersionBody>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Report returned by asset deletion: which stored files were removed
/// and which could not be.
#[derive(Debug, Serialize)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

fn version_body(base: &RequestBase, version: AssetVersion) -> VersionBody {
    VersionBody {
        version_number: version.version_number,
        file_url: base.join(&version.file_path),
        timestamp: version.created_at,
    }
}

/// Assemble the response shape for one asset row and its versions.
pub(crate) fn asset_body(
    base: &RequestBase,
    row: AssetWithRefs,
    versions: Vec<AssetVersion>,
) -> AssetBody {
    let owner = row.owner_id.map(|id| OwnerSummary {
        id,
        username: row.owner_username.clone().unwrap_or_default(),
        email: row.owner_email.clone().unwrap_or_default(),
    });
    let project = row.project_id.map(|id| ProjectRef {
        id,
        name: row.project_name.clone().unwrap_or_default(),
    });

    AssetBody {
        id: row.id,
        name: row.name,
        description: row.description,
        tags: row.tags,
        file_url: base.join(&row.file_path),
        screenshot: base.join_opt(row.screenshot_path.as_deref()),
        metadata: row.metadata,
        owner,
        project,
        versions: versions
            .into_iter()
            .map(|v| version_body(base, v))
            .collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Fetch version histories for a batch of asset rows and assemble
/// response bodies, preserving row order.
pub(crate) async fn bodies_with_versions(
    pool: &DbPool,
    base: &RequestBase,
    rows: Vec<AssetWithRefs>,
) -> AppResult<Vec<AssetBody>> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

    let mut by_asset: HashMap<DbId, Vec<AssetVersion>> = HashMap::new();
    for version in VersionRepo::list_for_assets(pool, &ids).await? {
        by_asset.entry(version.asset_id).or_default().push(version);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let versions = by_asset.remove(&row.id).unwrap_or_default();
            asset_body(base, row, versions)
        })
        .collect())
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_kind(raw: &str) -> AppResult<AssetKind> {
    raw.parse::<AssetKind>().map_err(AppError::Core)
}

fn store_error(err: std::io::Error) -> AppError {
    AppError::InternalError(format!("Upload store error: {err}"))
}

async fn ensure_asset_exists(pool: &DbPool, id: DbId) -> AppResult<()> {
    if !AssetRepo::exists(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }));
    }
    Ok(())
}

/// Re-fetch an asset with its references and versions for a response body.
async fn fetch_body(state: &AppState, base: &RequestBase, id: DbId) -> AppResult<AssetBody> {
    let row = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;
    let versions = VersionRepo::list(&state.pool, id).await?;
    Ok(asset_body(base, row, versions))
}

/// GET /api/assets
///
/// Lists assets, optionally filtered by type, tags, project, and owner.
pub async fn list(
    State(state): State<AppState>,
    base: RequestBase,
    Query(params): Query<AssetListQuery>,
) -> AppResult<Json<Vec<AssetBody>>> {
    let kind = match params.kind.as_deref() {
        Some(raw) => Some(parse_kind(raw)?.as_str().to_string()),
        None => None,
    };
    let tags = params.tags.as_deref().map(|raw| split_tags(Some(raw)));

    let filter = AssetFilter {
        kind,
        tags: tags.filter(|t| !t.is_empty()),
        project_id: params.project_id,
        owner_id: params.owner_id,
    };

    let rows = AssetRepo::search(&state.pool, &filter).await?;
    let bodies = bodies_with_versions(&state.pool, &base, rows).await?;
    Ok(Json(bodies))
}

/// GET /api/assets/subcategories?type=...
///
/// Lists assets of a single required type. The type parameter is
/// mandatory here, unlike the general listing.
pub async fn subcategories(
    State(state): State<AppState>,
    base: RequestBase,
    Query(params): Query<SubcategoryQuery>,
) -> AppResult<Json<Vec<AssetBody>>> {
    let raw = params
        .kind
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("Asset type is required".into())))?;
    let kind = parse_kind(raw)?;

    let filter = AssetFilter {
        kind: Some(kind.as_str().to_string()),
        ..AssetFilter::default()
    };

    let rows = AssetRepo::search(&state.pool, &filter).await?;
    let bodies = bodies_with_versions(&state.pool, &base, rows).await?;
    Ok(Json(bodies))
}

/// GET /api/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssetBody>> {
    let body = fetch_body(&state, &base, id).await?;
    Ok(Json(body))
}

/// POST /api/assets
///
/// Multipart creation: common fields (`type`, `name`, `description`,
/// `tags`, `owner_id`, `project_id`), type-specific metadata fields, the
/// main `file` part, and a `screenshot` part (required for 3D models).
/// Referential checks run before any file is written, so a doomed
/// request leaves nothing in the upload store.
pub async fn create(
    State(state): State<AppState>,
    base: RequestBase,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<AssetBody>)> {
    let form = FormData::collect(multipart).await?;

    let kind = parse_kind(&form.require_field("type")?)?;
    let name = form.require_field("name")?;
    let description = form.field("description").unwrap_or_default().to_string();
    let tags = split_tags(form.field("tags"));
    let owner_id = form.require_id("owner_id")?;
    let project_id = form.require_id("project_id")?;

    let metadata = AssetMetadata::from_fields(kind, &form.fields).map_err(AppError::Core)?;

    let file = form
        .file("file")
        .ok_or_else(|| AppError::Core(CoreError::Validation("Main file is required".into())))?;
    let screenshot = form.file("screenshot");
    if kind.requires_screenshot() && screenshot.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Screenshot is required for 3D model assets".into(),
        )));
    }

    if !UserRepo::exists(&state.pool, owner_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: owner_id,
        }));
    }
    if !ProjectRepo::exists(&state.pool, project_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }));
    }

    let file_path = state
        .files
        .save(&file.filename, &file.data)
        .await
        .map_err(store_error)?;
    let screenshot_path = match screenshot {
        Some(shot) => Some(
            state
                .files
                .save(&shot.filename, &shot.data)
                .await
                .map_err(store_error)?,
        ),
        None => None,
    };

    let asset = AssetRepo::create(
        &state.pool,
        &CreateAsset {
            owner_id,
            project_id,
            kind: kind.as_str().to_string(),
            name,
            description,
            tags,
            file_path,
            screenshot_path,
            metadata: metadata.to_value(),
        },
    )
    .await?;

    tracing::info!(asset_id = asset.id, kind = %kind, "Asset created");

    let body = fetch_body(&state, &base, asset.id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PATCH /api/assets/{id}
///
/// Partial update of name, description, tags, and type-specific
/// metadata. Metadata patches are field-merged into the stored document
/// and re-validated; the asset's type cannot be changed.
pub async fn update(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetRequest>,
) -> AppResult<Json<AssetBody>> {
    let current = AssetRepo::find_row(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;

    let metadata = match &input.metadata {
        Some(patch) => Some(
            AssetMetadata::patched(&current.metadata, patch)
                .map_err(AppError::Core)?
                .to_value(),
        ),
        None => None,
    };

    AssetRepo::update(
        &state.pool,
        id,
        &UpdateAsset {
            name: input.name,
            description: input.description,
            tags: input.tags,
            metadata,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Asset",
        id,
    }))?;

    let body = fetch_body(&state, &base, id).await?;
    Ok(Json(body))
}

/// DELETE /api/assets/{id}
///
/// Removes the database record and every stored file the asset
/// references (main file, screenshot, version files). File removal is
/// best-effort: failures are reported in the response instead of
/// aborting the deletion.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteReport>> {
    let asset = AssetRepo::find_row(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;
    let versions = VersionRepo::list(&state.pool, id).await?;

    let mut paths: Vec<String> = Vec::with_capacity(versions.len() + 2);
    paths.push(asset.file_path.clone());
    if let Some(shot) = &asset.screenshot_path {
        paths.push(shot.clone());
    }
    paths.extend(versions.into_iter().map(|v| v.file_path));
    // Version 1 shares the main file path.
    paths.sort();
    paths.dedup();

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    for path in paths {
        match state.files.remove(&path).await {
            Ok(true) => deleted.push(path),
            Ok(false) => {
                // Already missing; nothing to report.
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %path, "Failed to remove stored file");
                failed.push(path);
            }
        }
    }

    AssetRepo::delete(&state.pool, id).await?;
    tracing::info!(
        asset_id = id,
        deleted = deleted.len(),
        failed = failed.len(),
        "Asset deleted"
    );

    Ok(Json(DeleteReport { deleted, failed }))
}

/// GET /api/assets/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<VersionBody>>> {
    ensure_asset_exists(&state.pool, id).await?;

    let versions = VersionRepo::list(&state.pool, id).await?;
    Ok(Json(
        versions.into_iter().map(|v| version_body(&base, v)).collect(),
    ))
}

/// POST /api/assets/{id}/versions
///
/// Multipart: a `version_number` field and a `file` part. A duplicate
/// version number surfaces as 409 via the unique constraint.
pub async fn add_version(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<AssetBody>)> {
    let form = FormData::collect(multipart).await?;

    let raw_number = form.require_field("version_number")?;
    let version_number: i32 = raw_number.parse().map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Field 'version_number' must be an integer, got '{raw_number}'"
        )))
    })?;
    let file = form
        .file("file")
        .ok_or_else(|| AppError::Core(CoreError::Validation("Version file is required".into())))?;

    ensure_asset_exists(&state.pool, id).await?;

    let file_path = state
        .files
        .save(&file.filename, &file.data)
        .await
        .map_err(store_error)?;

    VersionRepo::add(&state.pool, id, version_number, &file_path).await?;
    tracing::info!(asset_id = id, version_number, "Version added");

    let body = fetch_body(&state, &base, id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// DELETE /api/assets/{id}/versions/{number}
///
/// Removing an absent version is a silent no-op. The stored file is
/// left in place until the asset itself is deleted, which sweeps every
/// referenced path.
pub async fn delete_version(
    State(state): State<AppState>,
    Path((id, number)): Path<(DbId, i32)>,
) -> AppResult<StatusCode> {
    ensure_asset_exists(&state.pool, id).await?;

    let removed = VersionRepo::delete_by_number(&state.pool, id, number).await?;
    tracing::debug!(asset_id = id, version_number = number, removed, "Version delete");

    Ok(StatusCode::NO_CONTENT)
}
