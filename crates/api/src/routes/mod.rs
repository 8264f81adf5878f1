pub mod account;
pub mod auth;
pub mod health;
pub mod project;
pub mod task;
pub mod workspace;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                           register (public)
/// /auth/sign-in                           password sign-in (public)
/// /auth/verify-email                      confirm email code (public)
/// /auth/resend-code                       resend email code (public)
/// /auth/google                            start Google sign-in (public)
/// /auth/google/callback                   finish Google sign-in (public)
/// /auth/sign-out                          revoke all sessions
/// /auth/me                                current user
///
/// /account/profile                        update name, image
/// /account/password                       change password
///
/// /workspaces                             list, create
/// /workspaces/{id}                        get, update, delete
/// /workspaces/{id}/info                   name and image
/// /workspaces/{id}/analytics              month-over-month counts
/// /workspaces/{id}/reset-invite-code      new invite code
/// /workspaces/{id}/join                   join with invite code
/// /workspaces/{id}/members                list members
/// /workspaces/{id}/members/{user_id}      remove member
///
/// /projects                               list (?workspace_id=), create
/// /projects/{id}                          get, update, delete
/// /projects/{id}/analytics                month-over-month counts
///
/// /tasks                                  list (filters), create
/// /tasks/bulk-update                      atomic status + position update
/// /tasks/move                             apply one drag gesture
/// /tasks/{id}                             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        .nest("/workspaces", workspace::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
