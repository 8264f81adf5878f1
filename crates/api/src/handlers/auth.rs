//! Handlers for the `/auth` resource: password sign-up and sign-in, email
//! verification, sign-out, and Google sign-in.

use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::session::SESSION_COOKIE;
use taskboard_core::verification::{check_code, generate_code, is_pending, KIND_EMAIL_VERIFICATION};
use taskboard_db::models::account::{CreateAccount, PROVIDER_GOOGLE};
use taskboard_db::models::user::{CreateUser, User};
use taskboard_db::models::verification::UpsertVerification;
use taskboard_db::repositories::{AccountRepo, UserRepo, VerificationRepo};
use validator::Validate;

use crate::auth::cookie::{read_cookie, SetCookie};
use crate::auth::oauth::{
    code_challenge, generate_code_verifier, generate_state, OAuthIdentity, ROUND_TRIP_COOKIE_SECS,
    STATE_COOKIE, VERIFIER_COOKIE,
};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{create_session, invalidate_user_sessions, SessionMetadata};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::mail::verification_email;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const EMAIL_SENT: &str = "Confirmation email sent!";
const EMAIL_ALREADY_SENT: &str = "Email already sent. Try after a few minutes";
const RESTART_OAUTH: &str = "Please restart the process.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Minimum 6 characters required"))]
    pub password: String,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Minimum 6 characters required"))]
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Invalid code!"))]
    pub otp: String,
}

/// Request body for `POST /auth/resend-code`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResendCodeRequest {
    #[validate(email(message = "Email is required"))]
    pub email: String,
}

/// Query string of `GET /auth/google/callback`.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Password flows
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// A verified account with this email blocks the sign-up; an unverified one
/// is replaced. A confirmation code is emailed unless one is still pending.
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    let email = normalize_email(&input.email);

    if let Some(existing) = UserRepo::find_by_email(&state.pool, &email).await? {
        if existing.is_verified() {
            return Err(CoreError::field("email", "Email is already taken").into());
        }
        UserRepo::delete(&state.pool, existing.id).await?;
        tracing::info!(user_id = %existing.id, "Unverified user replaced by new sign-up");
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash: Some(password_hash),
            email_verified_at: None,
            image: None,
        },
    )
    .await?;

    if !verification_pending(&state, &user.email).await? {
        send_verification(&state, &user).await?;
    }

    tracing::info!(user_id = %user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/sign-in
///
/// Unverified users get a fresh confirmation code instead of a session.
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> AppResult<Response> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|user| user.password_hash.is_some())
        .ok_or_else(|| CoreError::field("email", "Email does not exist!"))?;

    if !user.is_verified() {
        if verification_pending(&state, &user.email).await? {
            return Err(CoreError::Application(EMAIL_ALREADY_SENT.into()).into());
        }
        send_verification(&state, &user).await?;
        return Ok(Json(MessageResponse::ok(EMAIL_SENT)).into_response());
    }

    let stored_hash = user.password_hash.as_deref().unwrap_or_default();
    let valid = verify_password(&input.password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(CoreError::Application("Invalid credentials!".into()).into());
    }

    let session = create_session(
        &state.pool,
        &state.config.session_policy,
        user.id,
        SessionMetadata::from_headers(&headers),
    )
    .await?;
    let cookie = SetCookie::until(
        SESSION_COOKIE,
        &session.token,
        session.expires_at,
        state.config.secure_cookies,
    );

    tracing::info!(user_id = %user.id, "User signed in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_header_value()?)]),
        Json(DataResponse { data: user }),
    )
        .into_response())
}

/// POST /api/v1/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<VerifyEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;

    let pending = VerificationRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::Core(CoreError::invalid_code()))?;
    check_code(&input.otp, &pending.code_hash, pending.expires_at, Utc::now())?;

    UserRepo::mark_verified(&state.pool, user.id).await?;
    VerificationRepo::delete(&state.pool, &email).await?;

    tracing::info!(user_id = %user.id, "Email verified");
    Ok(Json(MessageResponse::ok("Email verified!")))
}

/// POST /api/v1/auth/resend-code
pub async fn resend_code(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ResendCodeRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::Core(CoreError::not_found()))?;
    if user.is_verified() {
        return Err(CoreError::Application("Email is already verified".into()).into());
    }
    if verification_pending(&state, &email).await? {
        return Err(CoreError::Application(EMAIL_ALREADY_SENT.into()).into());
    }

    send_verification(&state, &user).await?;
    Ok(Json(MessageResponse::ok(EMAIL_SENT)))
}

/// POST /api/v1/auth/sign-out
///
/// Revokes every session of the user, not just the current one.
pub async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    invalidate_user_sessions(&state.pool, auth.user_id).await?;
    let cookie = SetCookie::removal(SESSION_COOKIE, state.config.secure_cookies);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_header_value()?)]),
        Json(MessageResponse::ok("Signed out")),
    )
        .into_response())
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser) -> Json<DataResponse<User>> {
    Json(DataResponse { data: auth.user })
}

// ---------------------------------------------------------------------------
// Google
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/google
///
/// Redirects to Google with a fresh `state` and PKCE challenge; both secrets
/// ride along in ten-minute cookies.
pub async fn google_start(State(state): State<AppState>) -> AppResult<Response> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| CoreError::NotFound("Google sign-in is not configured".into()))?;

    let oauth_state = generate_state();
    let verifier = generate_code_verifier();
    let url = oauth
        .authorization_url(&oauth_state, &code_challenge(&verifier))
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let secure = state.config.secure_cookies;
    let state_cookie =
        SetCookie::for_secs(STATE_COOKIE, &oauth_state, ROUND_TRIP_COOKIE_SECS, secure);
    let verifier_cookie =
        SetCookie::for_secs(VERIFIER_COOKIE, &verifier, ROUND_TRIP_COOKIE_SECS, secure);

    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, header_value(&url)?),
            (SET_COOKIE, state_cookie.to_header_value()?),
            (SET_COOKIE, verifier_cookie.to_header_value()?),
        ]),
    )
        .into_response())
}

/// GET /api/v1/auth/google/callback
///
/// Any mismatch or provider failure answers 400 "Please restart the process.".
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Response> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| CoreError::NotFound("Google sign-in is not configured".into()))?;

    let stored_state = read_cookie(&headers, STATE_COOKIE);
    let verifier = read_cookie(&headers, VERIFIER_COOKIE);
    let (Some(code), Some(returned_state), Some(stored_state), Some(verifier)) =
        (params.code, params.state, stored_state, verifier)
    else {
        return Err(restart());
    };
    if returned_state != stored_state {
        tracing::warn!("OAuth state mismatch");
        return Err(restart());
    }

    let identity = oauth.exchange(&code, &verifier).await.map_err(|e| {
        tracing::warn!(error = %e, "Google code exchange failed");
        restart()
    })?;

    let user = find_or_create_google_user(&state, &identity).await?;
    let session = create_session(
        &state.pool,
        &state.config.session_policy,
        user.id,
        SessionMetadata::from_headers(&headers),
    )
    .await?;

    let secure = state.config.secure_cookies;
    let session_cookie = SetCookie::until(SESSION_COOKIE, &session.token, session.expires_at, secure);
    let location = format!("{}/", state.config.app_url);

    tracing::info!(user_id = %user.id, "User signed in with Google");
    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, header_value(&location)?),
            (SET_COOKIE, session_cookie.to_header_value()?),
            (SET_COOKIE, SetCookie::removal(STATE_COOKIE, secure).to_header_value()?),
            (SET_COOKIE, SetCookie::removal(VERIFIER_COOKIE, secure).to_header_value()?),
        ]),
    )
        .into_response())
}

/// Resolve a Google identity to a local user.
///
/// A known account wins; otherwise an existing user with the same email is
/// linked; otherwise a verified user is created.
async fn find_or_create_google_user(state: &AppState, identity: &OAuthIdentity) -> AppResult<User> {
    if let Some(account) =
        AccountRepo::find(&state.pool, PROVIDER_GOOGLE, &identity.provider_account_id).await?
    {
        return UserRepo::find_by_id(&state.pool, account.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found()));
    }

    let email = normalize_email(&identity.email);
    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(existing) if !existing.is_verified() && identity.email_verified => {
            UserRepo::mark_verified(&state.pool, existing.id)
                .await?
                .ok_or(AppError::Core(CoreError::not_found()))?
        }
        Some(existing) => existing,
        None => {
            let name = identity
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
            UserRepo::create(
                &state.pool,
                &CreateUser {
                    name,
                    email: email.clone(),
                    password_hash: None,
                    email_verified_at: Some(Utc::now()),
                    image: identity.image.clone(),
                },
            )
            .await?
        }
    };

    AccountRepo::create(
        &state.pool,
        &CreateAccount {
            provider: PROVIDER_GOOGLE.to_string(),
            provider_account_id: identity.provider_account_id.clone(),
            user_id: user.id,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Google account linked");
    Ok(user)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn restart() -> AppError {
    AppError::Core(CoreError::Application(RESTART_OAUTH.into()))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::InternalError(format!("Invalid header: {e}")))
}

async fn verification_pending(state: &AppState, email: &str) -> AppResult<bool> {
    let pending = VerificationRepo::find_by_email(&state.pool, email)
        .await?
        .is_some_and(|v| is_pending(v.expires_at, Utc::now()));
    Ok(pending)
}

/// Store a new code (replacing any old one) and email it.
async fn send_verification(state: &AppState, user: &User) -> AppResult<()> {
    let issued = generate_code();
    let expiry_secs = state.config.email_code_expiry_secs;

    VerificationRepo::upsert(
        &state.pool,
        &UpsertVerification {
            email: user.email.clone(),
            kind: KIND_EMAIL_VERIFICATION.to_string(),
            code_hash: issued.code_hash,
            expires_at: Utc::now() + Duration::seconds(expiry_secs),
        },
    )
    .await?;

    state
        .mailer
        .send(verification_email(&user.email, &user.name, &issued.code, expiry_secs))
        .await
        .map_err(|e| AppError::InternalError(format!("Email delivery failed: {e}")))?;

    tracing::info!(user_id = %user.id, "Verification code sent");
    Ok(())
}
