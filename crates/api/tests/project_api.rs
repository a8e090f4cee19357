//! HTTP-level integration tests for the project registry endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    assert_error, body_json, delete, get, post_json, seed_project, seed_sound_asset, seed_user,
    send_multipart, MultipartForm,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_returns_201_with_owner(pool: PgPool) {
    let owner = seed_user(&pool, "boss@example.com").await;

    let app = common::build_test_app(pool);
    let form = MultipartForm::new()
        .text("name", "New Game")
        .text("description", "A new game project")
        .text("owner_id", &owner.to_string());
    let response = send_multipart(app, Method::POST, "/api/projects", form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "New Game");
    assert_eq!(json["description"], "A new game project");
    assert_eq!(json["active"], true);
    assert_eq!(json["owner"]["id"], owner);
    assert_eq!(json["owner"]["email"], "boss@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_with_cover_returns_url(pool: PgPool) {
    let owner = seed_user(&pool, "art@example.com").await;

    let app = common::build_test_app(pool);
    let form = MultipartForm::new()
        .text("name", "Covered")
        .text("owner_id", &owner.to_string())
        .file("cover_image", "cover.jpg", b"jpg-bytes");
    let response = send_multipart(app, Method::POST, "/api/projects", form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let cover = json["cover_image"].as_str().unwrap();
    assert!(cover.starts_with("http://localhost/uploads/"));
    assert!(cover.ends_with(".jpg"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_with_unknown_owner_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let form = MultipartForm::new()
        .text("name", "Orphan")
        .text("owner_id", "999999");
    let response = send_multipart(app, Method::POST, "/api/projects", form).await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_without_name_returns_400(pool: PgPool) {
    let owner = seed_user(&pool, "nameless@example.com").await;

    let app = common::build_test_app(pool);
    let form = MultipartForm::new().text("owner_id", &owner.to_string());
    let response = send_multipart(app, Method::POST, "/api/projects", form).await;
    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_is_first_member(pool: PgPool) {
    let owner = seed_user(&pool, "founder@example.com").await;
    let project = seed_project(&pool, "Founded", owner).await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/projects/{project}/users")).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], owner);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_and_get_project(pool: PgPool) {
    let owner = seed_user(&pool, "lister@example.com").await;
    let project = seed_project(&pool, "Listed", owner).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/projects").await).await;
    assert!(json.as_array().unwrap().iter().any(|p| p["id"] == project));

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/projects/{project}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Listed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects/999999").await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_project_partial_fields(pool: PgPool) {
    let owner = seed_user(&pool, "updater@example.com").await;
    let project = seed_project(&pool, "Before", owner).await;

    let app = common::build_test_app(pool);
    let form = MultipartForm::new()
        .text("name", "After")
        .text("active", "false");
    let response =
        send_multipart(app, Method::PATCH, &format!("/api/projects/{project}"), form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "After");
    assert_eq!(json["active"], false);
    // Owner is untouched by the patch.
    assert_eq!(json["owner"]["id"], owner);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_project_with_bad_active_returns_400(pool: PgPool) {
    let owner = seed_user(&pool, "flags@example.com").await;
    let project = seed_project(&pool, "Flagged", owner).await;

    let app = common::build_test_app(pool);
    let form = MultipartForm::new().text("active", "maybe");
    let response =
        send_multipart(app, Method::PATCH, &format!("/api/projects/{project}"), form).await;
    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_project_returns_204_then_404(pool: PgPool) {
    let owner = seed_user(&pool, "closer@example.com").await;
    let project = seed_project(&pool, "Closing", owner).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{project}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/projects/{project}")).await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_project_detaches_assets(pool: PgPool) {
    let owner = seed_user(&pool, "keeper@example.com").await;
    let project = seed_project(&pool, "Doomed", owner).await;
    let asset = seed_sound_asset(&pool, "Survivor", owner, project).await;

    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/projects/{project}")).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/assets/{asset}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["project"].is_null());
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_member_is_idempotent(pool: PgPool) {
    let owner = seed_user(&pool, "lead@example.com").await;
    let member = seed_user(&pool, "dev@example.com").await;
    let project = seed_project(&pool, "Team", owner).await;

    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/projects/{project}/users"),
            serde_json::json!({"user_id": member}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/projects/{project}/users")).await).await;
    assert_eq!(json.as_array().unwrap().len(), 2); // owner + member, once each
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_unknown_member_returns_404(pool: PgPool) {
    let owner = seed_user(&pool, "solo@example.com").await;
    let project = seed_project(&pool, "Solo", owner).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/projects/{project}/users"),
        serde_json::json!({"userId": 999999}),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}

// ---------------------------------------------------------------------------
// Project assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn attach_moves_asset_between_projects(pool: PgPool) {
    let owner = seed_user(&pool, "mover@example.com").await;
    let first = seed_project(&pool, "First", owner).await;
    let second = seed_project(&pool, "Second", owner).await;
    let asset = seed_sound_asset(&pool, "Mobile", owner, first).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/projects/{second}/assets"),
        serde_json::json!({"asset_id": asset}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Gone from the first project, present in the second.
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/projects/{first}/assets")).await).await;
    assert!(json.as_array().unwrap().is_empty());

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/projects/{second}/assets")).await).await;
    assert!(json.as_array().unwrap().iter().any(|a| a["id"] == asset));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detach_only_affects_own_project(pool: PgPool) {
    let owner = seed_user(&pool, "detacher@example.com").await;
    let home = seed_project(&pool, "Home", owner).await;
    let other = seed_project(&pool, "Other", owner).await;
    let asset = seed_sound_asset(&pool, "Rooted", owner, home).await;

    // Detaching through a project the asset is not in is a no-op.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{other}/assets/{asset}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/assets/{asset}")).await).await;
    assert_eq!(json["project"]["id"], home);

    // Detaching through the right project clears it.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/projects/{home}/assets/{asset}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/assets/{asset}")).await).await;
    assert!(json["project"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn attach_unknown_asset_returns_404(pool: PgPool) {
    let owner = seed_user(&pool, "hopeful@example.com").await;
    let project = seed_project(&pool, "Hopeful", owner).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/projects/{project}/assets"),
        serde_json::json!({"assetId": 999999}),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}
