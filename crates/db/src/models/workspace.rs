//! Workspace model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `workspaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    /// Owner.
    pub user_id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub invite_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What a prospective member may see before joining.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceInfo {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub user_id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub invite_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub image: Option<String>,
}
