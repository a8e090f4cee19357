pub mod assets;
pub mod health;
pub mod projects;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/login                         login
/// /users                               list, register (multipart)
/// /users/{id}                          get, update, delete
/// /users/{id}/projects                 memberships: list, add
/// /users/{id}/projects/{project_id}    membership: remove
/// /users/{id}/assets                   reachable assets
/// /users/{id}/favorites                favorites: list, add
/// /users/{id}/favorites/{asset_id}     favorite: remove
///
/// /projects                            list, create (multipart)
/// /projects/{id}                       get, update, delete
/// /projects/{id}/users                 members: list, add
/// /projects/{id}/users/{user_id}       member: remove
/// /projects/{id}/assets                assets: list, attach
/// /projects/{id}/assets/{asset_id}     asset: detach
///
/// /assets                              list, create (multipart)
/// /assets/subcategories                single-type listing
/// /assets/{id}                         get, update, delete
/// /assets/{id}/versions                versions: list, add
/// /assets/{id}/versions/{number}       version: remove
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/assets", assets::router())
}
