//! User directory handlers: registration, login, CRUD, and the
//! membership and favorites sub-resources.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use assetforge_core::error::CoreError;
use assetforge_core::types::DbId;
use assetforge_db::models::{CreateUser, ProjectSummary, UpdateUser, User, UserSummary};
use assetforge_db::repositories::{AssetRepo, ProjectRepo, UserRepo};
use assetforge_db::DbPool;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::base_url::RequestBase;
use crate::error::{AppError, AppResult};
use crate::handlers::assets::{bodies_with_versions, AssetBody};
use crate::multipart::FormData;
use crate::state::AppState;

/// JSON body for `POST /api/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// JSON body for adding a project membership.
#[derive(Debug, Deserialize)]
pub struct AddProjectRequest {
    #[serde(alias = "projectId")]
    pub project_id: DbId,
}

/// JSON body for adding a favorite.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(alias = "assetId")]
    pub asset_id: DbId,
}

/// Public user shape in list/detail responses.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub profile_photo: String,
}

/// The `user` object embedded in a login response.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
    pub token: String,
}

fn user_body(base: &RequestBase, user: UserSummary) -> UserBody {
    UserBody {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
        profile_photo: base.join(&user.profile_photo),
    }
}

fn full_user_body(base: &RequestBase, user: User) -> UserBody {
    UserBody {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
        profile_photo: base.join(&user.profile_photo),
    }
}

fn hash_error(err: argon2::password_hash::Error) -> AppError {
    AppError::InternalError(format!("Password hashing failed: {err}"))
}

fn store_error(err: std::io::Error) -> AppError {
    AppError::InternalError(format!("Upload store error: {err}"))
}

async fn ensure_user_exists(pool: &DbPool, id: DbId) -> AppResult<()> {
    if !UserRepo::exists(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    Ok(())
}

/// POST /api/users
///
/// Multipart: `name`, `email`, `password` fields plus a `profile_photo`
/// file part. The email must be unused; the photo is mandatory.
pub async fn register(
    State(state): State<AppState>,
    base: RequestBase,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let form = FormData::collect(multipart).await?;

    let username = form.require_field("name")?;
    let email = form.require_field("email")?;
    let password = form.require_field("password")?;
    let photo = form.file("profile_photo").ok_or_else(|| {
        AppError::Core(CoreError::Validation("Profile photo is required".into()))
    })?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&password).map_err(hash_error)?;
    let profile_photo = state
        .files
        .save(&photo.filename, &photo.data)
        .await
        .map_err(store_error)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            profile_photo,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "profile_photo": base.join(&user.profile_photo),
        })),
    ))
}

/// POST /api/users/login
///
/// An unknown email and a wrong password fail differently: 404 for the
/// missing account, 401 for the bad password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let verified = verify_password(&input.password, &user.password_hash).map_err(hash_error)?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect password".into(),
        )));
    }

    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Successful login".to_string(),
        user: LoginUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        },
        token,
    }))
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    base: RequestBase,
) -> AppResult<Json<Vec<UserBody>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(|u| user_body(&base, u)).collect()))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserBody>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(full_user_body(&base, user)))
}

/// PATCH /api/users/{id}
///
/// Multipart partial update. A supplied `password` is re-hashed; a
/// supplied `profile_photo` part replaces the stored photo path.
pub async fn update(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<UserBody>> {
    let form = FormData::collect(multipart).await?;

    let password_hash = match form.field("password") {
        Some(password) => Some(hash_password(password).map_err(hash_error)?),
        None => None,
    };
    let profile_photo = match form.file("profile_photo") {
        Some(photo) => Some(
            state
                .files
                .save(&photo.filename, &photo.data)
                .await
                .map_err(store_error)?,
        ),
        None => None,
    };

    let update = UpdateUser {
        username: form.field("username").map(str::to_string),
        email: form.field("email").map(str::to_string),
        password_hash,
        profile_photo,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(full_user_body(&base, user)))
}

/// DELETE /api/users/{id}
///
/// Owned projects and assets survive with their owner reference nulled;
/// memberships and favorites are removed with the user.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let removed = UserRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    ensure_user_exists(&state.pool, id).await?;
    let projects = UserRepo::list_projects(&state.pool, id).await?;
    Ok(Json(projects))
}

/// POST /api/users/{id}/projects
///
/// Adds the user to a project. The membership is stored once; the
/// project's member list reflects the change immediately.
pub async fn add_project(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddProjectRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_user_exists(&state.pool, id).await?;
    if !ProjectRepo::exists(&state.pool, input.project_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }));
    }

    ProjectRepo::add_member(&state.pool, input.project_id, id).await?;
    Ok(Json(json!({ "message": "Project added to user" })))
}

/// DELETE /api/users/{id}/projects/{project_id}
///
/// Removing an absent membership is a silent no-op.
pub async fn remove_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_user_exists(&state.pool, id).await?;
    ProjectRepo::remove_member(&state.pool, project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/assets
///
/// Assets the user can reach: owned assets plus assets in projects the
/// user belongs to.
pub async fn list_assets(
    State(state): State<AppState>,
    base: RequestBase,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<AssetBody>>> {
    ensure_user_exists(&state.pool, id).await?;
    let rows = AssetRepo::list_for_member(&state.pool, id).await?;
    let bodies = bodies_with_versions(&state.pool, &base, rows).await?;
    Ok(Json(bodies))
}

/// GET /api/users/{id}/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<serde_json::Value>>> {
    ensure_user_exists(&state.pool, id).await?;
    let favorites = UserRepo::list_favorites(&state.pool, id).await?;
    Ok(Json(
        favorites.into_iter().map(|id| json!({ "id": id })).collect(),
    ))
}

/// POST /api/users/{id}/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddFavoriteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_user_exists(&state.pool, id).await?;
    if !AssetRepo::exists(&state.pool, input.asset_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id: input.asset_id,
        }));
    }

    UserRepo::add_favorite(&state.pool, id, input.asset_id).await?;
    Ok(Json(json!({ "message": "Asset added to favorites" })))
}

/// DELETE /api/users/{id}/favorites/{asset_id}
///
/// Removing an absent favorite is a silent no-op.
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((id, asset_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_user_exists(&state.pool, id).await?;
    UserRepo::remove_favorite(&state.pool, id, asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
