//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up           -> sign_up
/// POST /sign-in           -> sign_in
/// POST /verify-email      -> verify_email
/// POST /resend-code       -> resend_code
/// POST /sign-out          -> sign_out (requires auth)
/// GET  /me                -> me (requires auth)
/// GET  /google            -> google_start
/// GET  /google/callback   -> google_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/verify-email", post(auth::verify_email))
        .route("/resend-code", post(auth::resend_code))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
        .route("/google", get(auth::google_start))
        .route("/google/callback", get(auth::google_callback))
}
