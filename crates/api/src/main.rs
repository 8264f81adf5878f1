use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_api::background;
use taskboard_api::auth::oauth::{GoogleConfig, GoogleOAuthClient, OAuthClient};
use taskboard_api::config::ServerConfig;
use taskboard_api::mail::smtp::{SmtpConfig, SmtpMailer};
use taskboard_api::mail::{LogMailer, Mailer};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        refresh_interval_days = config.session_policy.refresh_interval().num_days(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = taskboard_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    taskboard_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    taskboard_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Mail ---
    let mailer: Arc<dyn Mailer> = match SmtpConfig::from_env() {
        Some(smtp) => {
            tracing::info!(host = %smtp.smtp_host, "SMTP mailer configured");
            Arc::new(SmtpMailer::new(smtp).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    // --- Google sign-in ---
    let oauth: Option<Arc<dyn OAuthClient>> = GoogleConfig::from_env().map(|google| {
        tracing::info!("Google sign-in enabled");
        Arc::new(GoogleOAuthClient::new(google)) as Arc<dyn OAuthClient>
    });

    // --- Session cleanup ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(background::session_cleanup::run(
        pool.clone(),
        cleanup_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
        oauth,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Session cleanup stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
