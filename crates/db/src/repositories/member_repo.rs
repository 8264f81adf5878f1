//! Repository for the `members` table and membership checks.

use sqlx::PgPool;
use taskboard_core::roles::ROLE_ADMIN;
use taskboard_core::types::DbId;

use crate::models::member::{Member, WorkspaceMember};

const COLUMNS: &str = "id, user_id, workspace_id, role, created_at";

pub struct MemberRepo;

impl MemberRepo {
    /// Add a user to a workspace with the given role.
    pub async fn add(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (workspace_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(workspace_id)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Whether the user owns the workspace or has a member row in it.
    pub async fn is_member(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (is_member,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM workspaces WHERE id = $1 AND user_id = $2)
                 OR EXISTS (SELECT 1 FROM members WHERE workspace_id = $1 AND user_id = $2)",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(is_member)
    }

    /// The owner (reported as ADMIN) followed by every member, oldest first.
    pub async fn list_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<WorkspaceMember>, sqlx::Error> {
        sqlx::query_as::<_, WorkspaceMember>(
            "SELECT u.id AS user_id, u.name, u.email, u.image, $2::text AS role, w.created_at AS joined_at
               FROM workspaces w JOIN users u ON u.id = w.user_id
              WHERE w.id = $1
             UNION ALL
             SELECT u.id, u.name, u.email, u.image, m.role, m.created_at
               FROM members m JOIN users u ON u.id = m.user_id
              WHERE m.workspace_id = $1
             ORDER BY joined_at",
        )
        .bind(workspace_id)
        .bind(ROLE_ADMIN)
        .fetch_all(pool)
        .await
    }

    /// Remove a member row. The owner has none and cannot be removed this way.
    pub async fn remove(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE workspace_id = $1 AND user_id = $2")
            .bind(workspace_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
