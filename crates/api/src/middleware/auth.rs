//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::user::User;

use super::session::CurrentSession;
use crate::error::AppError;

/// Authenticated user resolved from the `session` cookie by
/// [`resolve_session`](super::session::resolve_session).
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub user: User,
    /// Server-side session id (token digest).
    pub session_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = parts
            .extensions
            .get::<CurrentSession>()
            .ok_or(AppError::Core(CoreError::Unauthenticated))?;

        Ok(AuthUser {
            user_id: current.0.user.id,
            user: current.0.user.clone(),
            session_id: current.0.session.id.clone(),
        })
    }
}
