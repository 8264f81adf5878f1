//! Integration tests for cookie session resolution: sliding refresh, expiry
//! cleanup, and cookie handling around sign-in.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, get, get_auth, post_json_auth, set_cookie_for, set_cookies, session_token,
    sign_up_and_sign_in, TEST_PASSWORD,
};
use sqlx::PgPool;
use taskboard_core::session::{session_id_for_token, SESSION_COOKIE};
use taskboard_db::repositories::SessionRepo;

fn token_of(cookie: &str) -> &str {
    cookie.split_once('=').unwrap().1
}

/// A session in the front half of its life is used without any write or
/// cookie re-issue.
#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_session_is_not_reissued(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, cookie) = sign_up_and_sign_in(&app, "Ada", "ada@example.com").await;
    let id = session_id_for_token(token_of(&cookie));
    let before = SessionRepo::find_by_id(&pool, &id).await.unwrap().unwrap();

    let response = get_auth(app.router(), "/api/v1/auth/me", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie_for(&response, SESSION_COOKIE).is_none());

    let after = SessionRepo::find_by_id(&pool, &id).await.unwrap().unwrap();
    assert_eq!(before.expires_at, after.expires_at);
}

/// A session in the back half of its life is extended to the full window and
/// the cookie is re-sent with the new expiry.
#[sqlx::test(migrations = "../../db/migrations")]
async fn aging_session_is_refreshed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, cookie) = sign_up_and_sign_in(&app, "Ada", "ada@example.com").await;
    let id = session_id_for_token(token_of(&cookie));

    sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1")
        .bind(&id)
        .bind(Utc::now() + Duration::days(1))
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app.router(), "/api/v1/auth/me", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let reissued = set_cookie_for(&response, SESSION_COOKIE).expect("refreshed cookie");
    assert_eq!(session_token(&response).as_deref(), Some(token_of(&cookie)));
    assert!(reissued.contains("Expires="));

    let session = SessionRepo::find_by_id(&pool, &id).await.unwrap().unwrap();
    let remaining = session.expires_at - Utc::now();
    assert!(remaining > Duration::days(29), "expiry should slide to ~30 days");
}

/// An expired session is deleted, the request is unauthenticated, and the
/// cookie is cleared.
#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_session_is_removed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, cookie) = sign_up_and_sign_in(&app, "Ada", "ada@example.com").await;
    let id = session_id_for_token(token_of(&cookie));

    sqlx::query("UPDATE sessions SET expires_at = NOW() - INTERVAL '1 second' WHERE id = $1")
        .bind(&id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app.router(), "/api/v1/auth/me", &cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_for(&response, SESSION_COOKIE)
        .unwrap()
        .contains("Max-Age=0"));
    assert!(SessionRepo::find_by_id(&pool, &id).await.unwrap().is_none());
}

/// An unknown token clears the cookie.
#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_token_clears_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.router(), "/api/v1/auth/me", "session=not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_for(&response, SESSION_COOKIE)
        .unwrap()
        .starts_with("session=;"));
}

/// Requests without a cookie get no `Set-Cookie` back.
#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_request_sets_no_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app.router(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
}

/// Signing in over a stale cookie keeps the handler's new cookie and does not
/// append a removal for the same name.
#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_in_cookie_wins_over_stale_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    sign_up_and_sign_in(&app, "Ada", "ada@example.com").await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/auth/sign-in",
        serde_json::json!({ "email": "ada@example.com", "password": TEST_PASSWORD }),
        "session=stale-token",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let session_headers: Vec<String> = set_cookies(&response)
        .into_iter()
        .filter(|c| c.starts_with("session="))
        .collect();
    assert_eq!(session_headers.len(), 1);
    assert!(session_token(&response).is_some());
    assert_eq!(body_json(response).await["data"]["email"], "ada@example.com");
}

/// The stored id is the digest of the token, never the token itself.
#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_token_is_not_stored(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, cookie) = sign_up_and_sign_in(&app, "Ada", "ada@example.com").await;
    let token = token_of(&cookie);

    assert!(SessionRepo::find_by_id(&pool, token).await.unwrap().is_none());
    assert!(SessionRepo::find_by_id(&pool, &session_id_for_token(token))
        .await
        .unwrap()
        .is_some());
}
