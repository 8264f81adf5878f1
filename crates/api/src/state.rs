use std::sync::Arc;

use crate::auth::oauth::OAuthClient;
use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taskboard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound email (SMTP, or a logger when SMTP is not configured).
    pub mailer: Arc<dyn Mailer>,
    /// Google sign-in. `None` when `GOOGLE_CLIENT_ID` is not set.
    pub oauth: Option<Arc<dyn OAuthClient>>,
}
