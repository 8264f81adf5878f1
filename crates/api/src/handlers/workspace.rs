//! Handlers for the `/workspaces` resource, its members, and invite codes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskboard_core::analytics::{MonthWindow, TaskAnalytics};
use taskboard_core::error::CoreError;
use taskboard_core::roles::ROLE_MEMBER;
use taskboard_core::types::DbId;
use taskboard_core::workspace::{check_invite_code, generate_invite_code};
use taskboard_db::models::member::WorkspaceMember;
use taskboard_db::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace, WorkspaceInfo};
use taskboard_db::repositories::{MemberRepo, TaskRepo, WorkspaceRepo};
use validator::Validate;

use super::{ensure_member, owned_workspace};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /workspaces` and `PATCH /workspaces/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct WorkspaceRequest {
    #[validate(length(min = 1, max = 256, message = "Name is required"))]
    pub name: String,
    pub image: Option<String>,
}

/// Request body for `POST /workspaces/{id}/join`.
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, message = "Invite code is required"))]
    pub code: String,
}

/// Response for `DELETE` endpoints.
#[derive(Debug, Serialize)]
pub struct DeletedId {
    pub id: DbId,
}

/// A workspace together with everyone who can see it.
#[derive(Debug, Serialize)]
pub struct WorkspaceDetail {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub members: Vec<WorkspaceMember>,
}

/// POST /api/v1/workspaces
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<WorkspaceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Workspace>>)> {
    let workspace = WorkspaceRepo::create(
        &state.pool,
        &CreateWorkspace {
            user_id: auth.user_id,
            name: input.name.trim().to_string(),
            image: input.image,
            invite_code: generate_invite_code(),
        },
    )
    .await?;

    tracing::info!(workspace_id = %workspace.id, user_id = %auth.user_id, "Workspace created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: workspace })))
}

/// GET /api/v1/workspaces
///
/// Workspaces the caller owns or has joined.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Workspace>>>> {
    let workspaces = WorkspaceRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: workspaces }))
}

/// GET /api/v1/workspaces/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkspaceDetail>>> {
    ensure_member(&state.pool, id, auth.user_id).await?;
    let workspace = WorkspaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    let members = MemberRepo::list_for_workspace(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: WorkspaceDetail { workspace, members },
    }))
}

/// PATCH /api/v1/workspaces/{id}
///
/// Owner only.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<WorkspaceRequest>,
) -> AppResult<Json<DataResponse<Workspace>>> {
    let update = UpdateWorkspace {
        name: Some(input.name.trim().to_string()),
        image: input.image,
    };
    let workspace = WorkspaceRepo::update(&state.pool, id, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: workspace }))
}

/// DELETE /api/v1/workspaces/{id}
///
/// Owner only. Members, projects, and tasks go with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedId>>> {
    if !WorkspaceRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(CoreError::not_found().into());
    }
    tracing::info!(workspace_id = %id, user_id = %auth.user_id, "Workspace deleted");
    Ok(Json(DataResponse { data: DeletedId { id } }))
}

/// GET /api/v1/workspaces/{id}/info
///
/// Name and image only, for the join page. Any signed-in user may ask.
pub async fn info(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkspaceInfo>>> {
    let info = WorkspaceRepo::find_info(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: info }))
}

/// GET /api/v1/workspaces/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskAnalytics>>> {
    ensure_member(&state.pool, id, auth.user_id).await?;

    let now = Utc::now();
    let window = MonthWindow::containing(now);
    let counts = TaskRepo::monthly_counts(&state.pool, id, None, auth.user_id, &window, now).await?;
    let (this_month, last_month) = counts.split();

    Ok(Json(DataResponse {
        data: TaskAnalytics::compare(this_month, last_month),
    }))
}

/// POST /api/v1/workspaces/{id}/reset-invite-code
///
/// Owner only. The previous code stops working immediately.
pub async fn reset_invite_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Workspace>>> {
    let workspace =
        WorkspaceRepo::set_invite_code(&state.pool, id, auth.user_id, &generate_invite_code())
            .await?
            .ok_or(AppError::Core(CoreError::not_found()))?;
    tracing::info!(workspace_id = %id, "Invite code reset");
    Ok(Json(DataResponse { data: workspace }))
}

/// POST /api/v1/workspaces/{id}/join
pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<JoinRequest>,
) -> AppResult<Json<DataResponse<Workspace>>> {
    let workspace = WorkspaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;

    if MemberRepo::is_member(&state.pool, id, auth.user_id).await? {
        return Err(CoreError::Application("Already a member".into()).into());
    }
    check_invite_code(&workspace.invite_code, &input.code)?;

    MemberRepo::add(&state.pool, id, auth.user_id, ROLE_MEMBER).await?;

    tracing::info!(workspace_id = %id, user_id = %auth.user_id, "User joined workspace");
    Ok(Json(DataResponse { data: workspace }))
}

/// GET /api/v1/workspaces/{id}/members
///
/// The owner is listed first with the ADMIN role.
pub async fn members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WorkspaceMember>>>> {
    ensure_member(&state.pool, id, auth.user_id).await?;
    let members = MemberRepo::list_for_workspace(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// DELETE /api/v1/workspaces/{id}/members/{user_id}
///
/// Owner only. The owner cannot be removed this way.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_workspace(&state.pool, id, auth.user_id).await?;
    if !MemberRepo::remove(&state.pool, id, user_id).await? {
        return Err(CoreError::not_found().into());
    }
    tracing::info!(workspace_id = %id, user_id = %user_id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}
