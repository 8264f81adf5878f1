//! Project model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project fields embedded in task listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub workspace_id: DbId,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub image: Option<String>,
}
