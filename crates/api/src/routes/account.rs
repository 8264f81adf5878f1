//! Route definitions for the `/account` resource.

use axum::routing::{patch, put};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. All require auth.
///
/// ```text
/// PATCH /profile   -> update_profile
/// PUT   /password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", patch(account::update_profile))
        .route("/password", put(account::change_password))
}
