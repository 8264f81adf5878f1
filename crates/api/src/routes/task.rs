//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`. All require auth.
///
/// ```text
/// GET    /?workspace_id=&project_id=&assignee_id=&status=&search=&due_before=
///                         -> list
/// POST   /                -> create
/// POST   /bulk-update     -> bulk_update
/// POST   /move            -> move_task
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/bulk-update", post(task::bulk_update))
        .route("/move", post(task::move_task))
        .route(
            "/{id}",
            get(task::get_by_id)
                .patch(task::update)
                .delete(task::delete),
        )
}
