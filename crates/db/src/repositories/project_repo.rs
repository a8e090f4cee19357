//! Repository for the `projects` table and the `project_members` join
//! table (the single source of truth for the project<->user relation).

use sqlx::PgPool;

use assetforge_core::types::DbId;

use crate::models::project::{
    CreateProject, MemberSummary, Project, ProjectWithOwner, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, active, cover_image, owner_id, created_at, updated_at";

/// Project columns plus joined owner summary, for detail/list queries.
const OWNER_COLUMNS: &str = "\
    p.id, p.name, p.description, p.active, p.cover_image, p.owner_id, \
    p.created_at, p.updated_at, \
    u.username AS owner_username, u.email AS owner_email";

/// Provides CRUD operations for projects and membership.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project and auto-add the owner as its sole member.
    /// Both writes happen in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, owner_id, cover_image)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.owner_id)
            .bind(&input.cover_image)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project.id)
        .bind(input.owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID, with the owner summary joined in.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {OWNER_COLUMNS} FROM projects p
             LEFT JOIN users u ON u.id = p.owner_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProjectWithOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {OWNER_COLUMNS} FROM projects p
             LEFT JOIN users u ON u.id = p.owner_id
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithOwner>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                active = COALESCE($4, active),
                cover_image = COALESCE($5, cover_image),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.active)
            .bind(&input.cover_image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Memberships cascade; contained assets are
    /// detached (`project_id` nulled) by the schema.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a project row exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar("SELECT id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// List a project's members.
    pub async fn list_members(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MemberSummary>, sqlx::Error> {
        sqlx::query_as::<_, MemberSummary>(
            "SELECT u.id, u.username, u.email
             FROM users u
             JOIN project_members pm ON pm.user_id = u.id
             WHERE pm.project_id = $1
             ORDER BY pm.created_at",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Add a user to a project. Idempotent set-add. Because the relation
    /// is stored once, this also makes the project appear in the user's
    /// project list.
    pub async fn add_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a user from a project. Returns `true` if a row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
