//! Route definitions for the `/workspaces` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::workspace;
use crate::state::AppState;

/// Routes mounted at `/workspaces`. All require auth.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PATCH  /{id}                          -> update (owner)
/// DELETE /{id}                          -> delete (owner)
/// GET    /{id}/info                     -> info
/// GET    /{id}/analytics                -> analytics
/// POST   /{id}/reset-invite-code        -> reset_invite_code (owner)
/// POST   /{id}/join                     -> join
/// GET    /{id}/members                  -> members
/// DELETE /{id}/members/{user_id}        -> remove_member (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workspace::list).post(workspace::create))
        .route(
            "/{id}",
            get(workspace::get_by_id)
                .patch(workspace::update)
                .delete(workspace::delete),
        )
        .route("/{id}/info", get(workspace::info))
        .route("/{id}/analytics", get(workspace::analytics))
        .route("/{id}/reset-invite-code", post(workspace::reset_invite_code))
        .route("/{id}/join", post(workspace::join))
        .route("/{id}/members", get(workspace::members))
        .route("/{id}/members/{user_id}", delete(workspace::remove_member))
}
