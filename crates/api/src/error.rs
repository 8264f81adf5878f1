use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::{CoreError, FieldErrors};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON envelopes clients expect:
///
/// - request shape problems: `{ "error": { "formErrors": [...], "fieldErrors": {...} } }`
/// - domain errors: `{ "message": ..., "name": ... }` with the error's status
/// - anything unexpected: `500 { "message": "Server error" }`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request body or query failed `validator` rules.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    /// A request body or query could not be parsed at all.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message (never shown to clients).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Core(core) => core_error_response(core),
            AppError::Database(err) => database_error_response(&err),
            AppError::Validation(errors) => {
                form_error_response(Vec::new(), flatten_validation_errors(&errors))
            }
            AppError::BadRequest(msg) => form_error_response(vec![msg], FieldErrors::new()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                server_error()
            }
        }
    }
}

fn core_error_response(err: CoreError) -> Response {
    let status = match &err {
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Validation(_) | CoreError::Application(_) | CoreError::Token(_) => {
            StatusCode::BAD_REQUEST
        }
        CoreError::RateLimited(_) => StatusCode::LOCKED,
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            return server_error();
        }
    };

    let body = match &err {
        CoreError::Validation(fields) => json!({
            "message": err.to_string(),
            "name": err.name(),
            "fieldErrors": fields,
        }),
        _ => json!({
            "message": err.to_string(),
            "name": err.name(),
        }),
    };

    (status, axum::Json(body)).into_response()
}

/// Map storage failures to responses.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (SQLSTATE 23505) on `uq_` constraints map to
///   the domain error a racing request would have seen from the pre-check, or
///   409 for constraints without one.
/// - Everything else maps to 500 with a sanitized message.
fn database_error_response(err: &sqlx::Error) -> Response {
    match err {
        sqlx::Error::RowNotFound => core_error_response(CoreError::not_found()),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            unique_violation_response(db_err.constraint().unwrap_or_default())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            server_error()
        }
    }
}

fn unique_violation_response(constraint: &str) -> Response {
    match constraint {
        "uq_members_workspace_user" => {
            core_error_response(CoreError::Application("Already a member".into()))
        }
        "uq_users_email" => core_error_response(CoreError::field("email", "Email is already taken")),
        other => {
            tracing::warn!(constraint = other, "Unique constraint violation");
            (
                StatusCode::CONFLICT,
                axum::Json(json!({
                    "message": format!("Duplicate value violates unique constraint: {other}"),
                    "name": "ConflictError",
                })),
            )
                .into_response()
        }
    }
}

fn form_error_response(form_errors: Vec<String>, field_errors: FieldErrors) -> Response {
    let body = json!({
        "error": {
            "formErrors": form_errors,
            "fieldErrors": field_errors,
        }
    });
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "message": "Server error" })),
    )
        .into_response()
}

/// Flatten nested `validator` errors into `path -> messages`, e.g.
/// `tasks[0].position -> ["..."]`.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = BTreeMap::new();
    collect_errors(errors, "", &mut out);
    out
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                for e in list {
                    messages.push(
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                    );
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
