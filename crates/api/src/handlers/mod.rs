pub mod account;
pub mod auth;
pub mod project;
pub mod task;
pub mod workspace;

use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::workspace::Workspace;
use taskboard_db::repositories::{MemberRepo, WorkspaceRepo};
use taskboard_db::DbPool;

use crate::error::{AppError, AppResult};

/// Fail with 404 unless `user_id` owns or belongs to the workspace.
///
/// Non-members get the same answer as for a missing workspace.
pub(crate) async fn ensure_member(pool: &DbPool, workspace_id: DbId, user_id: DbId) -> AppResult<()> {
    if MemberRepo::is_member(pool, workspace_id, user_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found()))
    }
}

/// Load a workspace owned by `user_id`, or 404.
pub(crate) async fn owned_workspace(
    pool: &DbPool,
    workspace_id: DbId,
    user_id: DbId,
) -> AppResult<Workspace> {
    WorkspaceRepo::find_owned(pool, workspace_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))
}
