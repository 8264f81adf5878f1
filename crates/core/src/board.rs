//! Kanban board reordering.
//!
//! A workspace's tasks form one list in display order (descending position).
//! A drag gesture moves a task inside that list and possibly into another
//! status column; afterwards every position is recomputed as
//! `len - index`, so the first task holds the highest position and the last
//! holds 1. Only rows whose status or position changed are reported as dirty,
//! and that subset is what gets persisted through the bulk-update endpoint.
//!
//! Everything here is pure: the input list is never mutated, and callers get
//! back the new list together with the dirty subset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::task::TaskStatus;
use crate::types::DbId;

/// The fields of a task that the board cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    pub id: DbId,
    pub status: TaskStatus,
    pub position: i32,
}

/// What is being dragged, or what it is dropped onto.
///
/// Serialized as `{"type": "task", "id": "<uuid>"}` or
/// `{"type": "column", "id": "TODO"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DragTarget {
    Task(DbId),
    Column(TaskStatus),
}

/// A completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragOp {
    pub active: DragTarget,
    pub over: DragTarget,
}

/// Result of applying a drag to a task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reordered {
    /// The full list in its new display order, positions recomputed.
    pub tasks: Vec<BoardTask>,
    /// Rows whose status or position differ from the input, in new order.
    pub dirty: Vec<BoardTask>,
}

impl Reordered {
    fn unchanged(tasks: &[BoardTask]) -> Self {
        Self {
            tasks: tasks.to_vec(),
            dirty: Vec::new(),
        }
    }
}

/// Apply a task drag to `tasks`, which must be in display order.
///
/// * Task onto task, same status: list-move to the target's index.
/// * Task onto task, different status: take the target's status and land
///   directly ahead of the target.
/// * Task onto column: take the column's status, keep the index.
/// * Dropping onto itself, or dragging a column, changes nothing.
pub fn reorder(tasks: &[BoardTask], op: &DragOp) -> Result<Reordered, CoreError> {
    let active_id = match op.active {
        DragTarget::Task(id) => id,
        DragTarget::Column(_) => return Ok(Reordered::unchanged(tasks)),
    };
    let from = index_of(tasks, active_id, "active")?;

    let mut next = tasks.to_vec();
    match op.over {
        DragTarget::Task(over_id) => {
            let over = index_of(tasks, over_id, "over")?;
            if from == over {
                return Ok(Reordered::unchanged(tasks));
            }

            let target_status = tasks[over].status;
            let to = if next[from].status != target_status {
                next[from].status = target_status;
                // Removing `from` first shifts everything after it up by one.
                if from < over {
                    over - 1
                } else {
                    over
                }
            } else {
                over
            };

            let moved = next.remove(from);
            next.insert(to, moved);
        }
        DragTarget::Column(status) => {
            next[from].status = status;
        }
    }

    renumber(&mut next);
    let dirty = changed_rows(tasks, &next);
    Ok(Reordered { tasks: next, dirty })
}

fn index_of(tasks: &[BoardTask], id: DbId, field: &str) -> Result<usize, CoreError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| CoreError::field(field, &format!("Unknown task {id}")))
}

/// Rewrite positions as `len - index`.
fn renumber(tasks: &mut [BoardTask]) {
    let len = tasks.len() as i32;
    for (index, task) in tasks.iter_mut().enumerate() {
        task.position = len - index as i32;
    }
}

fn changed_rows(before: &[BoardTask], after: &[BoardTask]) -> Vec<BoardTask> {
    let previous: HashMap<DbId, &BoardTask> = before.iter().map(|t| (t.id, t)).collect();
    after
        .iter()
        .filter(|t| {
            previous
                .get(&t.id)
                .is_none_or(|p| p.status != t.status || p.position != t.position)
        })
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Column order plus the workspace's tasks in display order.
///
/// Column order is client-local state; it never reaches the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanBoard {
    pub columns: Vec<TaskStatus>,
    pub tasks: Vec<BoardTask>,
}

/// A board after a drag, with the rows that need persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub board: KanbanBoard,
    pub dirty: Vec<BoardTask>,
}

impl KanbanBoard {
    /// Build a board with the default columns, sorting tasks by descending
    /// position. Ties keep their input order.
    pub fn new(mut tasks: Vec<BoardTask>) -> Self {
        tasks.sort_by(|a, b| b.position.cmp(&a.position));
        Self {
            columns: TaskStatus::ALL.to_vec(),
            tasks,
        }
    }

    /// Tasks of one column, top to bottom.
    pub fn column(&self, status: TaskStatus) -> impl Iterator<Item = &BoardTask> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// Apply a drag gesture. Column onto column reorders the columns;
    /// anything involving a task goes through [`reorder`].
    pub fn apply(&self, op: &DragOp) -> Result<BoardUpdate, CoreError> {
        if let (DragTarget::Column(active), DragTarget::Column(over)) = (op.active, op.over) {
            let mut columns = self.columns.clone();
            let from = columns.iter().position(|c| *c == active);
            let to = columns.iter().position(|c| *c == over);
            if let (Some(from), Some(to)) = (from, to) {
                let moved = columns.remove(from);
                columns.insert(to, moved);
            }
            return Ok(BoardUpdate {
                board: Self {
                    columns,
                    tasks: self.tasks.clone(),
                },
                dirty: Vec::new(),
            });
        }

        let Reordered { tasks, dirty } = reorder(&self.tasks, op)?;
        Ok(BoardUpdate {
            board: Self {
                columns: self.columns.clone(),
                tasks,
            },
            dirty,
        })
    }
}
