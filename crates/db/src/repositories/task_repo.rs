//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskboard_core::analytics::MonthWindow;
use taskboard_core::board::BoardTask;
use taskboard_core::task::STATUS_DONE;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::task::{
    CreateTask, MonthlyTaskCounts, Task, TaskDetail, TaskDetailRow, TaskFilter, UpdateTask,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workspace_id, project_id, assignee_id, name, description, status, \
                        position, due_date, created_at, updated_at";

/// Task columns (aliased `t`) plus the embedded project and assignee fields.
const DETAIL_COLUMNS: &str = "t.id, t.workspace_id, t.project_id, t.assignee_id, t.name, \
                               t.description, t.status, t.position, t.due_date, t.created_at, \
                               t.updated_at, \
                               p.name AS project_name, p.image AS project_image, \
                               u.name AS assignee_name, u.email AS assignee_email, \
                               u.image AS assignee_image";

const DETAIL_FROM: &str = "FROM tasks t
             JOIN projects p ON p.id = t.project_id
             JOIN users u ON u.id = t.assignee_id";

/// Provides CRUD, listing, and bulk placement writes for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (workspace_id, project_id, assignee_id, name, description, status, position, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.workspace_id)
            .bind(input.project_id)
            .bind(input.assignee_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.position)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task with its project and assignee embedded.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TaskDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TaskDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TaskDetail::from))
    }

    /// Fetch every task whose id is in `ids`. Missing ids are simply absent.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = ANY($1)");
        sqlx::query_as::<_, Task>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Highest position currently held in the workspace, if it has any tasks.
    pub async fn highest_position(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let (highest,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(position) FROM tasks WHERE workspace_id = $1")
                .bind(workspace_id)
                .fetch_one(pool)
                .await?;
        Ok(highest)
    }

    /// List tasks matching `filter`, highest position first.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE t.workspace_id = $1
               AND ($2::uuid IS NULL OR t.project_id = $2)
               AND ($3::uuid IS NULL OR t.assignee_id = $3)
               AND ($4::text IS NULL OR t.status = $4)
               AND ($5::text IS NULL OR t.name ILIKE '%' || $5 || '%')
               AND ($6::timestamptz IS NULL OR t.due_date < $6)
             ORDER BY t.position DESC, t.created_at DESC"
        );
        let rows = sqlx::query_as::<_, TaskDetailRow>(&query)
            .bind(filter.workspace_id)
            .bind(filter.project_id)
            .bind(filter.assignee_id)
            .bind(&filter.status)
            .bind(&filter.search)
            .bind(filter.due_before)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Every task of a workspace in board display order.
    pub async fn list_for_board(pool: &PgPool, workspace_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE workspace_id = $1
             ORDER BY position DESC, created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                project_id = COALESCE($2, project_id),
                assignee_id = COALESCE($3, assignee_id),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                status = COALESCE($6, status),
                due_date = COALESCE($7, due_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(input.assignee_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite status and position for every listed task in one statement
    /// inside one transaction.
    ///
    /// If any id no longer exists the transaction is rolled back and
    /// `sqlx::Error::RowNotFound` is returned, so the batch is all-or-nothing.
    pub async fn bulk_update_placement(
        pool: &PgPool,
        placements: &[BoardTask],
    ) -> Result<Vec<Task>, sqlx::Error> {
        let ids: Vec<DbId> = placements.iter().map(|p| p.id).collect();
        let statuses: Vec<String> = placements
            .iter()
            .map(|p| p.status.as_str().to_string())
            .collect();
        let positions: Vec<i32> = placements.iter().map(|p| p.position).collect();

        let query = format!(
            "UPDATE tasks SET status = u.new_status, position = u.new_position
             FROM UNNEST($1::uuid[], $2::text[], $3::int4[]) AS u(task_id, new_status, new_position)
             WHERE tasks.id = u.task_id
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(&ids)
            .bind(&statuses)
            .bind(&positions)
            .fetch_all(&mut *tx)
            .await?;

        if updated.len() != placements.len() {
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }
        tx.commit().await?;

        tracing::debug!(count = updated.len(), "Bulk task placement applied");
        Ok(updated)
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count tasks created in the current and previous month.
    ///
    /// `project_id` narrows the counts to one project. "Assigned" means
    /// assigned to `user_id`; "overdue" means not done and due before `now`.
    pub async fn monthly_counts(
        pool: &PgPool,
        workspace_id: DbId,
        project_id: Option<DbId>,
        user_id: DbId,
        window: &MonthWindow,
        now: Timestamp,
    ) -> Result<MonthlyTaskCounts, sqlx::Error> {
        sqlx::query_as::<_, MonthlyTaskCounts>(
            "WITH scoped AS (
                SELECT assignee_id, status, due_date, created_at >= $5 AS this_month
                  FROM tasks
                 WHERE workspace_id = $1
                   AND ($2::uuid IS NULL OR project_id = $2)
                   AND created_at >= $4 AND created_at < $6
             )
             SELECT
                COUNT(*) FILTER (WHERE this_month) AS this_total,
                COUNT(*) FILTER (WHERE this_month AND assignee_id = $3) AS this_assigned,
                COUNT(*) FILTER (WHERE this_month AND status = $7) AS this_complete,
                COUNT(*) FILTER (WHERE this_month AND status <> $7) AS this_incomplete,
                COUNT(*) FILTER (WHERE this_month AND status <> $7 AND due_date < $8) AS this_overdue,
                COUNT(*) FILTER (WHERE NOT this_month) AS last_total,
                COUNT(*) FILTER (WHERE NOT this_month AND assignee_id = $3) AS last_assigned,
                COUNT(*) FILTER (WHERE NOT this_month AND status = $7) AS last_complete,
                COUNT(*) FILTER (WHERE NOT this_month AND status <> $7) AS last_incomplete,
                COUNT(*) FILTER (WHERE NOT this_month AND status <> $7 AND due_date < $8) AS last_overdue
             FROM scoped",
        )
        .bind(workspace_id)
        .bind(project_id)
        .bind(user_id)
        .bind(window.last_month_start)
        .bind(window.this_month_start)
        .bind(window.next_month_start)
        .bind(STATUS_DONE)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}
