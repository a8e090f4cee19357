//! Route definitions for the user directory.
//!
//! All routes are mounted under `/users`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User directory routes mounted at `/users`.
///
/// ```text
/// POST   /                            -> register (multipart)
/// POST   /login                       -> login
/// GET    /                            -> list
/// GET    /{id}                        -> get_by_id
/// PATCH  /{id}                        -> update (multipart)
/// DELETE /{id}                        -> delete
/// GET    /{id}/projects               -> list_projects
/// POST   /{id}/projects               -> add_project
/// DELETE /{id}/projects/{project_id}  -> remove_project
/// GET    /{id}/assets                 -> list_assets
/// GET    /{id}/favorites              -> list_favorites
/// POST   /{id}/favorites              -> add_favorite
/// DELETE /{id}/favorites/{asset_id}   -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(users::login))
        .route("/", get(users::list).post(users::register))
        .route(
            "/{id}",
            get(users::get_by_id)
                .patch(users::update)
                .delete(users::delete),
        )
        .route(
            "/{id}/projects",
            get(users::list_projects).post(users::add_project),
        )
        .route(
            "/{id}/projects/{project_id}",
            axum::routing::delete(users::remove_project),
        )
        .route("/{id}/assets", get(users::list_assets))
        .route(
            "/{id}/favorites",
            get(users::list_favorites).post(users::add_favorite),
        )
        .route(
            "/{id}/favorites/{asset_id}",
            axum::routing::delete(users::remove_favorite),
        )
}
