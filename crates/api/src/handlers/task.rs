//! Handlers for the `/tasks` resource, bulk placement updates, and
//! server-side board moves.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::board::{reorder, BoardTask, DragOp, DragTarget, Reordered};
use taskboard_core::error::CoreError;
use taskboard_core::task::{next_position, TaskStatus, MAX_POSITION, MIN_POSITION};
use taskboard_core::types::{DbId, Timestamp};
use taskboard_db::models::task::{CreateTask, Task, TaskDetail, TaskFilter, UpdateTask};
use taskboard_db::repositories::{MemberRepo, ProjectRepo, TaskRepo};
use taskboard_db::DbPool;
use validator::Validate;

use super::ensure_member;
use super::workspace::DeletedId;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub workspace_id: DbId,
    pub project_id: DbId,
    pub assignee_id: DbId,
    #[validate(length(min = 1, max = 256, message = "Required"))]
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Timestamp,
}

/// Partial edit; absent fields stay as they are.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    #[validate(length(min = 1, max = 256, message = "Required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Timestamp>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListTasksQuery {
    pub workspace_id: DbId,
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub status: Option<TaskStatus>,
    #[validate(length(max = 256))]
    pub search: Option<String>,
    pub due_before: Option<Timestamp>,
}

/// Request body for `POST /tasks/bulk-update`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateRequest {
    #[validate(length(min = 1, message = "At least one task is required"), nested)]
    pub tasks: Vec<TaskPlacement>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct TaskPlacement {
    pub id: DbId,
    pub status: TaskStatus,
    #[validate(range(
        min = MIN_POSITION,
        max = MAX_POSITION,
        message = "Position must be between 1 and 1000000"
    ))]
    pub position: i32,
}

impl From<TaskPlacement> for BoardTask {
    fn from(p: TaskPlacement) -> Self {
        BoardTask {
            id: p.id,
            status: p.status,
            position: p.position,
        }
    }
}

/// Request body for `POST /tasks/move`.
#[derive(Debug, Deserialize, Validate)]
pub struct MoveRequest {
    pub workspace_id: DbId,
    pub active: DragTarget,
    pub over: DragTarget,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a task the caller may see, or 404.
async fn visible_task(pool: &DbPool, id: DbId, user_id: DbId) -> AppResult<Task> {
    let task = TaskRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    ensure_member(pool, task.workspace_id, user_id).await?;
    Ok(task)
}

async fn ensure_project_in_workspace(
    pool: &DbPool,
    project_id: DbId,
    workspace_id: DbId,
) -> AppResult<()> {
    let belongs = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .is_some_and(|p| p.workspace_id == workspace_id);
    if !belongs {
        return Err(CoreError::field("project_id", "Project not found in this workspace").into());
    }
    Ok(())
}

async fn ensure_assignee_in_workspace(
    pool: &DbPool,
    assignee_id: DbId,
    workspace_id: DbId,
) -> AppResult<()> {
    if !MemberRepo::is_member(pool, workspace_id, assignee_id).await? {
        return Err(
            CoreError::field("assignee_id", "Assignee is not a member of this workspace").into(),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks
///
/// New tasks go to the top of the board: one above the workspace's highest
/// position.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    ensure_member(&state.pool, input.workspace_id, auth.user_id).await?;
    ensure_project_in_workspace(&state.pool, input.project_id, input.workspace_id).await?;
    ensure_assignee_in_workspace(&state.pool, input.assignee_id, input.workspace_id).await?;

    let highest = TaskRepo::highest_position(&state.pool, input.workspace_id).await?;
    let task = TaskRepo::create(
        &state.pool,
        &CreateTask {
            workspace_id: input.workspace_id,
            project_id: input.project_id,
            assignee_id: input.assignee_id,
            name: input.name.trim().to_string(),
            description: input.description,
            status: input.status.as_str().to_string(),
            position: next_position(highest),
            due_date: input.due_date,
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        workspace_id = %task.workspace_id,
        position = task.position,
        "Task created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks?workspace_id=...
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListTasksQuery>,
) -> AppResult<Json<DataResponse<Vec<TaskDetail>>>> {
    ensure_member(&state.pool, query.workspace_id, auth.user_id).await?;

    let filter = TaskFilter {
        workspace_id: query.workspace_id,
        project_id: query.project_id,
        assignee_id: query.assignee_id,
        status: query.status.map(|s| s.as_str().to_string()),
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        due_before: query.due_before,
    };
    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskDetail>>> {
    visible_task(&state.pool, id, auth.user_id).await?;
    let detail = TaskRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/tasks/{id}
///
/// Authorized on the caller's own membership in the task's workspace.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = visible_task(&state.pool, id, auth.user_id).await?;

    if let Some(project_id) = input.project_id {
        ensure_project_in_workspace(&state.pool, project_id, task.workspace_id).await?;
    }
    if let Some(assignee_id) = input.assignee_id {
        ensure_assignee_in_workspace(&state.pool, assignee_id, task.workspace_id).await?;
    }

    let update = UpdateTask {
        project_id: input.project_id,
        assignee_id: input.assignee_id,
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        status: input.status.map(|s| s.as_str().to_string()),
        due_date: input.due_date,
    };
    let updated = TaskRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedId>>> {
    visible_task(&state.pool, id, auth.user_id).await?;
    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found().into());
    }
    tracing::info!(task_id = %id, user_id = %auth.user_id, "Task deleted");
    Ok(Json(DataResponse { data: DeletedId { id } }))
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks/bulk-update
///
/// Writes status and position for every listed task, all or nothing. All
/// tasks must live in one workspace the caller belongs to.
pub async fn bulk_update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<BulkUpdateRequest>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let mut seen = HashSet::with_capacity(input.tasks.len());
    if !input.tasks.iter().all(|t| seen.insert(t.id)) {
        return Err(CoreError::Application("Duplicate task ids in request".into()).into());
    }

    let ids: Vec<DbId> = input.tasks.iter().map(|t| t.id).collect();
    let existing = TaskRepo::find_by_ids(&state.pool, &ids).await?;
    if existing.len() != ids.len() {
        return Err(CoreError::not_found().into());
    }

    // Membership first, so outsiders cannot tell which ids exist.
    let workspaces: HashSet<DbId> = existing.iter().map(|t| t.workspace_id).collect();
    for id in &workspaces {
        ensure_member(&state.pool, *id, auth.user_id).await?;
    }
    let workspace_id = match workspaces.into_iter().collect::<Vec<_>>().as_slice() {
        [only] => *only,
        _ => {
            return Err(CoreError::Application(
                "All tasks must belong to the same workspace".into(),
            )
            .into())
        }
    };

    let placements: Vec<BoardTask> = input.tasks.into_iter().map(BoardTask::from).collect();
    let updated = TaskRepo::bulk_update_placement(&state.pool, &placements).await?;

    tracing::info!(
        workspace_id = %workspace_id,
        user_id = %auth.user_id,
        count = updated.len(),
        "Bulk task update applied"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/tasks/move
///
/// Applies one drag gesture against the stored board and persists only the
/// rows it changed.
pub async fn move_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<MoveRequest>,
) -> AppResult<Json<DataResponse<Reordered>>> {
    ensure_member(&state.pool, input.workspace_id, auth.user_id).await?;

    let board = TaskRepo::list_for_board(&state.pool, input.workspace_id)
        .await?
        .iter()
        .map(Task::board_task)
        .collect::<Result<Vec<_>, _>>()?;

    let op = DragOp {
        active: input.active,
        over: input.over,
    };
    let reordered = reorder(&board, &op)?;

    if !reordered.dirty.is_empty() {
        TaskRepo::bulk_update_placement(&state.pool, &reordered.dirty).await?;
        tracing::info!(
            workspace_id = %input.workspace_id,
            dirty = reordered.dirty.len(),
            "Board move persisted"
        );
    }

    Ok(Json(DataResponse { data: reordered }))
}
