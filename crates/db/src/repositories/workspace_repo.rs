//! Repository for the `workspaces` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace, WorkspaceInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, image, invite_code, created_at, updated_at";

/// Provides CRUD operations for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Insert a new workspace owned by `input.user_id`.
    pub async fn create(pool: &PgPool, input: &CreateWorkspace) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (user_id, name, image, invite_code)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.image)
            .bind(&input.invite_code)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a workspace only if `owner_id` owns it.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_info(pool: &PgPool, id: DbId) -> Result<Option<WorkspaceInfo>, sqlx::Error> {
        sqlx::query_as::<_, WorkspaceInfo>("SELECT id, name, image FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Workspaces the user owns or has joined, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Workspace>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workspaces
             WHERE user_id = $1
                OR id IN (SELECT workspace_id FROM members WHERE user_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an owned workspace. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the workspace does not exist or is not owned by `owner_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateWorkspace,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET
                name = COALESCE($3, name),
                image = COALESCE($4, image)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Replace the invite code of an owned workspace.
    pub async fn set_invite_code(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        invite_code: &str,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET invite_code = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(invite_code)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owned workspace; members, projects, and tasks cascade.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
