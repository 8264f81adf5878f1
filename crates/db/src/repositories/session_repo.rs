//! Repository for the `sessions` table.

use sqlx::PgPool;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, expires_at, ip_address, user_agent, created_at, updated_at";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (id, user_id, expires_at, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.id)
            .bind(input.user_id)
            .bind(input.expires_at)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id (the token hash), expired or not.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move the expiry forward. Never moves it backwards: returns `None` when
    /// the row is gone or already expires at or after `expires_at`.
    pub async fn extend(
        pool: &PgPool,
        id: &str,
        expires_at: Timestamp,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET expires_at = $2
             WHERE id = $1 AND expires_at < $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a single session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session of a user. Returns the count of deleted rows.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete sessions whose expiry has passed. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
