//! Server-side sessions: issue, validate with sliding refresh, revoke.

use axum::http::HeaderMap;
use taskboard_core::session::{generate_session_token, session_id_for_token, SessionCheck, SessionPolicy};
use taskboard_core::types::{DbId, Timestamp};
use taskboard_db::models::session::{CreateSession, Session};
use taskboard_db::models::user::User;
use taskboard_db::repositories::{SessionRepo, UserRepo};
use taskboard_db::DbPool;

/// Client details recorded alongside a new session.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl SessionMetadata {
    /// Take the first `x-forwarded-for` hop and the `user-agent` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty());
        Self {
            ip_address,
            user_agent: header("user-agent"),
        }
    }
}

/// A session that was just created. `token` goes into the cookie.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Result of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub session: Session,
    pub user: User,
    /// `true` when the expiry moved forward and the cookie must be re-sent.
    pub refreshed: bool,
}

/// Create a session for `user_id` starting now.
pub async fn create_session(
    pool: &DbPool,
    policy: &SessionPolicy,
    user_id: DbId,
    meta: SessionMetadata,
) -> Result<NewSession, sqlx::Error> {
    let issued = generate_session_token();
    let expires_at = policy.expiry_from(chrono::Utc::now());

    SessionRepo::create(
        pool,
        &CreateSession {
            id: issued.session_id,
            user_id,
            expires_at,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
        },
    )
    .await?;

    tracing::info!(user_id = %user_id, "Session created");
    Ok(NewSession {
        token: issued.token,
        expires_at,
    })
}

/// Resolve a raw token to its session and user.
///
/// Expired sessions and sessions whose user no longer exists are deleted and
/// reported as `None`. A session in the back half of its life is extended.
pub async fn validate_session_token(
    pool: &DbPool,
    policy: &SessionPolicy,
    token: &str,
    now: Timestamp,
) -> Result<Option<ValidatedSession>, sqlx::Error> {
    let id = session_id_for_token(token);
    let Some(mut session) = SessionRepo::find_by_id(pool, &id).await? else {
        return Ok(None);
    };

    let check = policy.evaluate(session.expires_at, now);
    if check == SessionCheck::Expired {
        SessionRepo::delete(pool, &id).await?;
        tracing::debug!(user_id = %session.user_id, "Expired session removed");
        return Ok(None);
    }

    let Some(user) = UserRepo::find_by_id(pool, session.user_id).await? else {
        SessionRepo::delete(pool, &id).await?;
        return Ok(None);
    };

    let mut refreshed = false;
    if let SessionCheck::Refresh { expires_at } = check {
        // A concurrent request may already have extended it; keep whatever is later.
        if let Some(extended) = SessionRepo::extend(pool, &id, expires_at).await? {
            session = extended;
            refreshed = true;
        }
    }

    Ok(Some(ValidatedSession {
        session,
        user,
        refreshed,
    }))
}

/// Revoke every session of a user. Returns how many were removed.
pub async fn invalidate_user_sessions(pool: &DbPool, user_id: DbId) -> Result<u64, sqlx::Error> {
    let removed = SessionRepo::delete_all_for_user(pool, user_id).await?;
    tracing::info!(user_id = %user_id, removed, "User sessions revoked");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn metadata_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        let meta = SessionMetadata::from_headers(&headers);

        assert_eq!(meta.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(meta.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn metadata_absent_headers_are_none() {
        let meta = SessionMetadata::from_headers(&HeaderMap::new());
        assert!(meta.ip_address.is_none());
        assert!(meta.user_agent.is_none());
    }
}
