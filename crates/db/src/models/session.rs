//! Session model and DTOs.

use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
///
/// `id` is the SHA-256 hex digest of the bearer token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
