//! Route definitions for the asset catalog.
//!
//! All routes are mounted under `/assets`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset catalog routes mounted at `/assets`.
///
/// `/subcategories` must be registered alongside `/{id}` as a literal
/// segment; axum gives literal segments priority over captures.
///
/// ```text
/// GET    /                         -> list (filterable)
/// POST   /                         -> create (multipart)
/// GET    /subcategories            -> subcategories (type required)
/// GET    /{id}                     -> get_by_id
/// PATCH  /{id}                     -> update (JSON)
/// DELETE /{id}                     -> delete (reports file removals)
/// GET    /{id}/versions            -> list_versions
/// POST   /{id}/versions            -> add_version (multipart)
/// DELETE /{id}/versions/{number}   -> delete_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list).post(assets::create))
        .route("/subcategories", get(assets::subcategories))
        .route(
            "/{id}",
            get(assets::get_by_id)
                .patch(assets::update)
                .delete(assets::delete),
        )
        .route(
            "/{id}/versions",
            get(assets::list_versions).post(assets::add_version),
        )
        .route("/{id}/versions/{number}", delete(assets::delete_version))
}
