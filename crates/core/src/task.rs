//! Task status constants and position bounds.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_BACKLOG: &str = "BACKLOG";
pub const STATUS_TODO: &str = "TODO";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_IN_REVIEW: &str = "IN_REVIEW";
pub const STATUS_DONE: &str = "DONE";

/// All valid status strings, in default board column order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_BACKLOG,
    STATUS_TODO,
    STATUS_IN_PROGRESS,
    STATUS_IN_REVIEW,
    STATUS_DONE,
];

// ---------------------------------------------------------------------------
// Position bounds
// ---------------------------------------------------------------------------

/// Lowest position a task may hold.
pub const MIN_POSITION: i32 = 1;

/// Highest position a client may submit in a bulk update.
pub const MAX_POSITION: i32 = 1_000_000;

/// Position for a new task given the current highest position in its workspace.
///
/// Computed over current rows, so deleting the top task frees its position for
/// the next insert.
pub fn next_position(highest: Option<i32>) -> i32 {
    highest.map_or(MIN_POSITION, |p| p.max(0) + 1)
}

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Kanban column a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    /// Default column order of the board.
    pub const ALL: [TaskStatus; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
    ];

    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => STATUS_BACKLOG,
            Self::Todo => STATUS_TODO,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::InReview => STATUS_IN_REVIEW,
            Self::Done => STATUS_DONE,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_BACKLOG => Ok(Self::Backlog),
            STATUS_TODO => Ok(Self::Todo),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_IN_REVIEW => Ok(Self::InReview),
            STATUS_DONE => Ok(Self::Done),
            other => Err(CoreError::field(
                "status",
                &format!(
                    "Unknown status '{other}'. Must be one of: {}",
                    VALID_STATUSES.join(", ")
                ),
            )),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
