//! Workspace membership.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub user_id: DbId,
    pub workspace_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

/// A member as listed on the members page: the owner plus every member row,
/// joined with the user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceMember {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub joined_at: Timestamp,
}
