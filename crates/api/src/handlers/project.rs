//! Handlers for the `/projects` resource.
//!
//! Every operation is scoped to the project's workspace and answers 404 to
//! callers who are not members of it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use taskboard_core::analytics::{MonthWindow, TaskAnalytics};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, Project, UpdateProject};
use taskboard_db::repositories::{ProjectRepo, TaskRepo};
use taskboard_db::DbPool;
use validator::Validate;

use super::ensure_member;
use super::workspace::DeletedId;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    pub workspace_id: DbId,
    #[validate(length(min = 1, max = 256, message = "Required"))]
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 256, message = "Must be 1 or more characters"))]
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListProjectsQuery {
    pub workspace_id: DbId,
}

/// Load a project the caller may see, or 404.
async fn visible_project(pool: &DbPool, id: DbId, user_id: DbId) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    ensure_member(pool, project.workspace_id, user_id).await?;
    Ok(project)
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    ensure_member(&state.pool, input.workspace_id, auth.user_id).await?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            workspace_id: input.workspace_id,
            name: input.name.trim().to_string(),
            image: input.image,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, workspace_id = %project.workspace_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects?workspace_id=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListProjectsQuery>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    ensure_member(&state.pool, query.workspace_id, auth.user_id).await?;
    let projects = ProjectRepo::list_by_workspace(&state.pool, query.workspace_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = visible_project(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    visible_project(&state.pool, id, auth.user_id).await?;

    let update = UpdateProject {
        name: input.name.map(|n| n.trim().to_string()),
        image: input.image,
    };
    let project = ProjectRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// The project's tasks are deleted with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedId>>> {
    visible_project(&state.pool, id, auth.user_id).await?;
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found().into());
    }
    tracing::info!(project_id = %id, user_id = %auth.user_id, "Project deleted");
    Ok(Json(DataResponse { data: DeletedId { id } }))
}

/// GET /api/v1/projects/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskAnalytics>>> {
    let project = visible_project(&state.pool, id, auth.user_id).await?;

    let now = Utc::now();
    let window = MonthWindow::containing(now);
    let counts = TaskRepo::monthly_counts(
        &state.pool,
        project.workspace_id,
        Some(project.id),
        auth.user_id,
        &window,
        now,
    )
    .await?;
    let (this_month, last_month) = counts.split();

    Ok(Json(DataResponse {
        data: TaskAnalytics::compare(this_month, last_month),
    }))
}
