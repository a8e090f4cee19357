//! Project registry handlers: CRUD plus the member and asset
//! sub-resources.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use assetforge_core::error::CoreError;
use assetforge_core::types::{DbId, Timestamp};
use assetforge_db::models::{
    AssetFilter, CreateProject, MemberSummary, ProjectWithOwner, UpdateProject,
};
use assetforge_db::repositories::{AssetRepo, ProjectRepo, UserRepo};
use assetforge_db::DbPool;

use crate::base_url::RequestBase;
use crate::error::{AppError, AppResult};
use crate::handlers::assets::{bodies_with_versions, AssetBody, OwnerSummary};
use crate::multipart::FormData;
use crate::state::AppState;

/// JSON body for attaching an asset to a project.
#[derive(Debug, Deserialize)]
pub struct AddAssetRequest {
    #[serde(alias = "assetId")]
    pub asset_id: DbId,
}

/// JSON body for adding a member to a project.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    #[serde(alias = "userId")]
    pub user_id: DbId,
}

/// Project response shape.
#[derive(Debug, Serialize)]
pub struct ProjectBody {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub owner: Option<OwnerSummary>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn project_body(base: &RequestBase, row: ProjectWithOwner) -> ProjectBody {
    let owner = row.owner_id.map(|id| OwnerSummary {
        id,
        username: row.owner_username.clone().unwrap_or_default(),
        email: row.owner_email.clone().unwrap_or_default(),
    });

    ProjectBody {
        id: row.id,
        name: row.name,
        description: row.description,
        active: row.active,
        cover_image: base.join_opt(row.cover_image.as_deref()),
        owner,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn store_error(err: std::io::Error) -> AppError {
    AppError::InternalError(format!("Upload store error: {err}"))
}

async fn ensure_project_exists(pool: &DbPool, id: DbId) -> AppResult<()> {
    if !ProjectRepo::exists(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    Ok(())
}

async fn fetch_body(state: &AppState, base: &RequestBase, id: DbId) -> AppResult<ProjectBody> {
    let row = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(project_body(base, row))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    base: RequestBase,
) -> AppResult<Json<Vec<ProjectBody>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(
        projects
            .into_iter()
            .map(|p| project_body(&base, p))
            .collect(),
    ))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectBody>> {
    let body = fetch_body(&state, &base, id).await?;
    Ok(Json(body))
}

/// POST /api/projects
///
/// Multipart: `name` and `owner_id` fields, an optional `description`
/// field, and an optional `cover_image` file part. The owner becomes the
/// project's first member.
pub async fn create(
    State(state): State<AppState>,
    base: RequestBase,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectBody>)> {
    let form = FormData::collect(multipart).await?;

    let name = form.require_field("name")?;
    let owner_id = form.require_id("owner_id")?;
    let description = form.field("description").map(str::to_string);

    if !UserRepo::exists(&state.pool, owner_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: owner_id,
        }));
    }

    let cover_image = match form.file("cover_image") {
        Some(cover) => Some(
            state
                .files
                .save(&cover.filename, &cover.data)
                .await
                .map_err(store_error)?,
        ),
        None => None,
    };

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            name,
            description,
            owner_id,
            cover_image,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, owner_id, "Project created");

    let body = fetch_body(&state, &base, project.id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PATCH /api/projects/{id}
///
/// Multipart partial update; `active` takes `"true"`/`"false"`, and a
/// `cover_image` part replaces the stored cover path.
pub async fn update(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<ProjectBody>> {
    let form = FormData::collect(multipart).await?;

    let active = match form.field("active") {
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Field 'active' must be 'true' or 'false', got '{other}'"
            ))))
        }
        None => None,
    };

    let cover_image = match form.file("cover_image") {
        Some(cover) => Some(
            state
                .files
                .save(&cover.filename, &cover.data)
                .await
                .map_err(store_error)?,
        ),
        None => None,
    };

    let update = UpdateProject {
        name: form.field("name").map(str::to_string),
        description: form.field("description").map(str::to_string),
        active,
        cover_image,
    };

    ProjectRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let body = fetch_body(&state, &base, id).await?;
    Ok(Json(body))
}

/// DELETE /api/projects/{id}
///
/// Assets in the project survive with their project reference nulled;
/// memberships are removed with the project.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ProjectRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/users
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<MemberSummary>>> {
    ensure_project_exists(&state.pool, id).await?;
    let members = ProjectRepo::list_members(&state.pool, id).await?;
    Ok(Json(members))
}

/// POST /api/projects/{id}/users
///
/// Adds a member. The membership is stored once, so the user's project
/// list reflects the change immediately.
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_project_exists(&state.pool, id).await?;
    if !UserRepo::exists(&state.pool, input.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }));
    }

    ProjectRepo::add_member(&state.pool, id, input.user_id).await?;
    Ok(Json(json!({ "message": "User added to project" })))
}

/// DELETE /api/projects/{id}/users/{user_id}
///
/// Removing an absent membership is a silent no-op.
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_project_exists(&state.pool, id).await?;
    ProjectRepo::remove_member(&state.pool, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/assets
pub async fn list_assets(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<AssetBody>>> {
    ensure_project_exists(&state.pool, id).await?;

    let filter = AssetFilter {
        project_id: Some(id),
        ..AssetFilter::default()
    };
    let rows = AssetRepo::search(&state.pool, &filter).await?;
    let bodies = bodies_with_versions(&state.pool, &base, rows).await?;
    Ok(Json(bodies))
}

/// POST /api/projects/{id}/assets
///
/// Attaches an asset to the project. An asset belongs to at most one
/// project, so this moves it if it was attached elsewhere.
pub async fn add_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddAssetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_project_exists(&state.pool, id).await?;

    let attached = AssetRepo::set_project(&state.pool, input.asset_id, id).await?;
    if !attached {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id: input.asset_id,
        }));
    }

    Ok(Json(json!({ "message": "Asset added to project" })))
}

/// DELETE /api/projects/{id}/assets/{asset_id}
///
/// Detaches the asset only if it is currently in this project; anything
/// else is a silent no-op.
pub async fn remove_asset(
    State(state): State<AppState>,
    Path((id, asset_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_project_exists(&state.pool, id).await?;
    AssetRepo::clear_project(&state.pool, asset_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
