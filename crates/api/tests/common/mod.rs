//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use taskboard_core::session::{SessionPolicy, SESSION_COOKIE};
use tower::ServiceExt;

use taskboard_api::auth::oauth::{OAuthClient, OAuthError, OAuthIdentity};
use taskboard_api::config::ServerConfig;
use taskboard_api::mail::{MailError, Mailer, OutgoingEmail};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_url: "http://localhost:5173".to_string(),
        secure_cookies: false,
        session_policy: SessionPolicy::default(),
        email_code_expiry_secs: 600,
    }
}

// ---------------------------------------------------------------------------
// Collaborator fakes
// ---------------------------------------------------------------------------

/// Keeps every email instead of sending it.
#[derive(Clone, Default)]
pub struct CapturingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl CapturingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// The six-digit code from the newest email addressed to `to`.
    pub fn last_code_for(&self, to: &str) -> String {
        let sent = self.sent.lock().unwrap();
        let email = sent
            .iter()
            .rev()
            .find(|e| e.to == to)
            .unwrap_or_else(|| panic!("no email sent to {to}"));
        extract_code(&email.body).expect("email should contain a code")
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

fn extract_code(body: &str) -> Option<String> {
    let chars: Vec<char> = body.chars().collect();
    chars
        .windows(6)
        .enumerate()
        .find(|(i, w)| {
            w.iter().all(char::is_ascii_digit)
                && !chars.get(i + 6).is_some_and(char::is_ascii_digit)
                && (*i == 0 || !chars[i - 1].is_ascii_digit())
        })
        .map(|(_, w)| w.iter().collect())
}

/// Google stand-in that answers every exchange with a fixed identity.
pub struct FakeOAuth {
    pub identity: OAuthIdentity,
}

#[async_trait]
impl OAuthClient for FakeOAuth {
    fn authorization_url(&self, state: &str, challenge: &str) -> Result<String, OAuthError> {
        Ok(format!(
            "https://accounts.example.test/auth?state={state}&code_challenge={challenge}"
        ))
    }

    async fn exchange(&self, code: &str, _verifier: &str) -> Result<OAuthIdentity, OAuthError> {
        if code == "bad" {
            return Err(OAuthError::Url("rejected".into()));
        }
        Ok(self.identity.clone())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// The full application router plus the mailer it sends through.
pub struct TestApp {
    pub router: Router,
    pub mailer: CapturingMailer,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

fn app_with(pool: PgPool, config: ServerConfig, oauth: Option<Arc<dyn OAuthClient>>) -> TestApp {
    let mailer = CapturingMailer::default();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Arc::new(mailer.clone()),
        oauth,
    };
    TestApp {
        router: build_app_router(state, &config),
        mailer,
    }
}

/// Build the application with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> TestApp {
    app_with(pool, test_config(), None)
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> TestApp {
    app_with(pool, config, None)
}

pub fn build_test_app_with_oauth(pool: PgPool, identity: OAuthIdentity) -> TestApp {
    app_with(pool, test_config(), Some(Arc::new(FakeOAuth { identity })))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(cookie)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(cookie)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body), Some(cookie)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(cookie)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(cookie)).await
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// Every `Set-Cookie` value on a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` value for `name`, if the response sets it.
pub fn set_cookie_for(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&prefix))
}

/// `name=value` pair suitable for a `Cookie` request header.
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookie_for(response, name).map(|c| c.split(';').next().unwrap().to_string())
}

/// The raw session token issued by a response.
pub fn session_token(response: &Response<Body>) -> Option<String> {
    cookie_pair(response, SESSION_COOKIE)
        .and_then(|pair| pair.split_once('=').map(|(_, v)| v.to_string()))
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "hunter22";

/// Sign up, confirm the emailed code, and sign in. Returns the new user's
/// JSON and a `Cookie` header value carrying the session.
pub async fn sign_up_and_sign_in(app: &TestApp, name: &str, email: &str) -> (serde_json::Value, String) {
    let response = post_json(
        app.router(),
        "/api/v1/auth/sign-up",
        serde_json::json!({ "name": name, "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "sign-up should succeed");

    let code = app.mailer.last_code_for(email);
    let response = post_json(
        app.router(),
        "/api/v1/auth/verify-email",
        serde_json::json!({ "email": email, "otp": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "verification should succeed");

    let response = post_json(
        app.router(),
        "/api/v1/auth/sign-in",
        serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "sign-in should succeed");
    let cookie = cookie_pair(&response, SESSION_COOKIE).expect("sign-in sets the session cookie");
    let json = body_json(response).await;
    (json["data"].clone(), cookie)
}

/// Create a workspace over HTTP and return its JSON.
pub async fn create_workspace(app: &TestApp, cookie: &str, name: &str) -> serde_json::Value {
    let response = post_json_auth(
        app.router(),
        "/api/v1/workspaces",
        serde_json::json!({ "name": name }),
        cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a project over HTTP and return its JSON.
pub async fn create_project(
    app: &TestApp,
    cookie: &str,
    workspace_id: &serde_json::Value,
    name: &str,
) -> serde_json::Value {
    let response = post_json_auth(
        app.router(),
        "/api/v1/projects",
        serde_json::json!({ "workspace_id": workspace_id, "name": name }),
        cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
