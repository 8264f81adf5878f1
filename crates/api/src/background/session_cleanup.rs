//! Periodic removal of expired sessions.
//!
//! Expired sessions are already deleted lazily when presented; this sweep
//! catches the ones that are never presented again.

use std::time::Duration;

use sqlx::PgPool;
use taskboard_db::repositories::SessionRepo;
use tokio_util::sync::CancellationToken;

/// Default sweep interval: 1 hour.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Run the session cleanup loop until `cancel` is triggered.
///
/// The interval comes from `SESSION_CLEANUP_INTERVAL_SECS` (default 3600).
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SESSION_CLEANUP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Session cleanup job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged expired sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
