//! Session-resolving middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use taskboard_core::session::SESSION_COOKIE;

use crate::auth::cookie::{read_cookie, SetCookie};
use crate::auth::session::{validate_session_token, ValidatedSession};
use crate::error::AppResult;
use crate::state::AppState;

/// The session and user behind the request's cookie. Present only when the
/// cookie named a live session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Arc<ValidatedSession>);

/// Validate the `session` cookie once per request.
///
/// - live session: inserts [`CurrentSession`]; re-sends the cookie when the
///   expiry moved forward;
/// - unknown or expired token: the cookie is cleared;
/// - no cookie: passes through untouched.
///
/// A cookie set by the handler itself (sign-in, sign-out) wins.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let secure = state.config.secure_cookies;
    let mut pending_cookie = None;

    if let Some(token) = read_cookie(req.headers(), SESSION_COOKIE) {
        let validated = validate_session_token(
            &state.pool,
            &state.config.session_policy,
            &token,
            Utc::now(),
        )
        .await?;

        match validated {
            Some(validated) => {
                if validated.refreshed {
                    tracing::debug!(user_id = %validated.user.id, "Session refreshed");
                    pending_cookie = Some(SetCookie::until(
                        SESSION_COOKIE,
                        &token,
                        validated.session.expires_at,
                        secure,
                    ));
                }
                req.extensions_mut()
                    .insert(CurrentSession(Arc::new(validated)));
            }
            None => pending_cookie = Some(SetCookie::removal(SESSION_COOKIE, secure)),
        }
    }

    let mut response = next.run(req).await;

    if let Some(cookie) = pending_cookie {
        if !sets_cookie(response.headers(), cookie.name()) {
            response
                .headers_mut()
                .append(SET_COOKIE, cookie.to_header_value()?);
        }
    }

    Ok(response)
}

fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    let prefix = format!("{name}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}
