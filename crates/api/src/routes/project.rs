//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`. All require auth.
///
/// ```text
/// GET    /?workspace_id=    -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/analytics    -> analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/analytics", get(project::analytics))
}
