use std::collections::BTreeMap;

/// Per-field validation messages, keyed by field path (e.g. `tasks[0].position`).
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Domain error taxonomy shared by every crate.
///
/// "Not authorised" and "does not exist" are deliberately the same variant
/// ([`CoreError::NotFound`]) so non-members cannot probe for resources.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("You must be logged in to view this content")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed!")]
    Validation(FieldErrors),

    #[error("{0}")]
    Application(String),

    #[error("{0}")]
    Token(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The generic "resource not found" error used for both missing rows and
    /// resources the caller may not see.
    pub fn not_found() -> Self {
        Self::NotFound("Resource not found".into())
    }

    /// An invalid or expired one-time code.
    pub fn invalid_code() -> Self {
        Self::Token("Invalid code!".into())
    }

    /// A validation error carrying a single message for a single field.
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        Self::Validation(errors)
    }

    /// Stable error name surfaced to clients in the `name` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "AuthenticationError",
            Self::Forbidden(_) => "AuthorizationError",
            Self::NotFound(_) => "NotFoundError",
            Self::Validation(_) => "ValidationError",
            Self::Application(_) => "ApplicationError",
            Self::Token(_) => "TokenExpiredError",
            Self::RateLimited(_) => "RateLimitError",
            Self::Internal(_) => "InternalError",
        }
    }
}
