use taskboard_core::session::{SessionPolicy, DEFAULT_REFRESH_INTERVAL_DAYS};
use taskboard_core::verification::DEFAULT_CODE_EXPIRY_SECS;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public URL of the web app; OAuth callbacks redirect here.
    pub app_url: String,
    /// `true` when `APP_ENV=production`; adds `Secure` to every cookie.
    pub secure_cookies: bool,
    /// Sliding session expiry rules.
    pub session_policy: SessionPolicy,
    /// Lifetime of an email verification code in seconds.
    pub email_code_expiry_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `APP_URL`                       | `http://localhost:5173` |
    /// | `APP_ENV`                       | `development`           |
    /// | `SESSION_REFRESH_INTERVAL_DAYS` | `15`                    |
    /// | `EMAIL_CONFIRMATION_EXPIRES`    | `600`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let secure_cookies = std::env::var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let refresh_days: i64 = std::env::var("SESSION_REFRESH_INTERVAL_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_INTERVAL_DAYS.to_string())
            .parse()
            .expect("SESSION_REFRESH_INTERVAL_DAYS must be a valid i64");
        assert!(refresh_days > 0, "SESSION_REFRESH_INTERVAL_DAYS must be positive");

        let email_code_expiry_secs: i64 = std::env::var("EMAIL_CONFIRMATION_EXPIRES")
            .unwrap_or_else(|_| DEFAULT_CODE_EXPIRY_SECS.to_string())
            .parse()
            .expect("EMAIL_CONFIRMATION_EXPIRES must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_url,
            secure_cookies,
            session_policy: SessionPolicy::from_days(refresh_days),
            email_code_expiry_secs,
        }
    }
}
