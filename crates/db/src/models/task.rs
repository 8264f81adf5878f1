//! Task model, DTOs, and board/analytics projections.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::analytics::TaskCounts;
use taskboard_core::board::BoardTask;
use taskboard_core::error::CoreError;
use taskboard_core::task::TaskStatus;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::project::ProjectSummary;
use crate::models::user::UserSummary;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub workspace_id: DbId,
    pub project_id: DbId,
    pub assignee_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i32,
    pub due_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// The fields the kanban board reorders.
    pub fn board_task(&self) -> Result<BoardTask, CoreError> {
        Ok(BoardTask {
            id: self.id,
            status: TaskStatus::from_str(&self.status)?,
            position: self.position,
        })
    }
}

/// Flat row produced by the task listing join.
#[derive(Debug, Clone, FromRow)]
pub struct TaskDetailRow {
    #[sqlx(flatten)]
    pub task: Task,
    pub project_name: String,
    pub project_image: Option<String>,
    pub assignee_name: String,
    pub assignee_email: String,
    pub assignee_image: Option<String>,
}

/// A task with its project and assignee embedded.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub project: ProjectSummary,
    pub assignee: UserSummary,
}

impl From<TaskDetailRow> for TaskDetail {
    fn from(row: TaskDetailRow) -> Self {
        let project = ProjectSummary {
            id: row.task.project_id,
            name: row.project_name,
            image: row.project_image,
        };
        let assignee = UserSummary {
            id: row.task.assignee_id,
            name: row.assignee_name,
            email: row.assignee_email,
            image: row.assignee_image,
        };
        Self {
            task: row.task,
            project,
            assignee,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub workspace_id: DbId,
    pub project_id: DbId,
    pub assignee_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i32,
    pub due_date: Timestamp,
}

/// Partial task edit. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Timestamp>,
}

/// Listing filters. Only `workspace_id` is required.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub workspace_id: DbId,
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub status: Option<String>,
    /// Case-insensitive substring match on the task name.
    pub search: Option<String>,
    /// Tasks due strictly before this instant.
    pub due_before: Option<Timestamp>,
}

/// Aggregate counts for the current and previous calendar month.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MonthlyTaskCounts {
    pub this_total: i64,
    pub this_assigned: i64,
    pub this_complete: i64,
    pub this_incomplete: i64,
    pub this_overdue: i64,
    pub last_total: i64,
    pub last_assigned: i64,
    pub last_complete: i64,
    pub last_incomplete: i64,
    pub last_overdue: i64,
}

impl MonthlyTaskCounts {
    /// Split into `(this_month, last_month)`.
    pub fn split(self) -> (TaskCounts, TaskCounts) {
        (
            TaskCounts {
                total: self.this_total,
                assigned: self.this_assigned,
                complete: self.this_complete,
                incomplete: self.this_incomplete,
                overdue: self.this_overdue,
            },
            TaskCounts {
                total: self.last_total,
                assigned: self.last_assigned,
                complete: self.last_complete,
                incomplete: self.last_incomplete,
                overdue: self.last_overdue,
            },
        )
    }
}
