//! Route definitions for the project registry.
//!
//! All routes are mounted under `/projects`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Project registry routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (multipart)
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update (multipart)
/// DELETE /{id}                      -> delete
/// GET    /{id}/users                -> list_members
/// POST   /{id}/users                -> add_member
/// DELETE /{id}/users/{user_id}      -> remove_member
/// GET    /{id}/assets               -> list_assets
/// POST   /{id}/assets               -> add_asset
/// DELETE /{id}/assets/{asset_id}    -> remove_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/users",
            get(projects::list_members).post(projects::add_member),
        )
        .route("/{id}/users/{user_id}", delete(projects::remove_member))
        .route(
            "/{id}/assets",
            get(projects::list_assets).post(projects::add_asset),
        )
        .route("/{id}/assets/{asset_id}", delete(projects::remove_asset))
}
