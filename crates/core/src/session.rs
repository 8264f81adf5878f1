//! Session token issuance and sliding-expiry policy.
//!
//! The client holds an opaque random token; the server only ever stores the
//! SHA-256 hex digest of it as the session id, so a database leak does not
//! yield usable bearer tokens.
//!
//! Expiry is a sliding window: a session validated inside the back half of its
//! life is extended to `now + max_duration`, where `max_duration` is twice the
//! refresh interval. A session used at least once per refresh interval never
//! expires; one idle for longer than `max_duration` does.

use chrono::Duration;
use rand::Rng;

use crate::hashing::sha256_hex;
use crate::types::Timestamp;

/// Name of the cookie carrying the raw session token.
pub const SESSION_COOKIE: &str = "session";

/// Length of the generated token (alphanumeric, ~190 bits of entropy).
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Default refresh interval; sessions last twice this long when idle.
pub const DEFAULT_REFRESH_INTERVAL_DAYS: i64 = 15;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A freshly generated session token and the id it hashes to.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Raw bearer token. Sent to the client in the session cookie, never stored.
    pub token: String,
    /// SHA-256 hex digest of `token`; the primary key of the session row.
    pub session_id: String,
}

/// Generate a new random session token.
pub fn generate_session_token() -> IssuedToken {
    let token: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let session_id = session_id_for_token(&token);
    IssuedToken { token, session_id }
}

/// Derive the server-side session id from a raw token.
pub fn session_id_for_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Outcome of checking a stored session's expiry at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// `now >= expires_at`; the row must be deleted.
    Expired,
    /// Still in the front half of its life; nothing to write.
    Valid,
    /// In the back half of its life; persist the new expiry.
    Refresh { expires_at: Timestamp },
}

/// Sliding-window expiry rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    refresh_interval: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from_days(DEFAULT_REFRESH_INTERVAL_DAYS)
    }
}

impl SessionPolicy {
    pub fn new(refresh_interval: Duration) -> Self {
        Self { refresh_interval }
    }

    pub fn from_days(days: i64) -> Self {
        Self::new(Duration::days(days))
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Maximum idle lifetime: twice the refresh interval.
    pub fn max_duration(&self) -> Duration {
        self.refresh_interval * 2
    }

    /// Expiry for a session created or refreshed at `now`.
    pub fn expiry_from(&self, now: Timestamp) -> Timestamp {
        now + self.max_duration()
    }

    /// Decide what to do with a session expiring at `expires_at` when it is
    /// presented at `now`.
    pub fn evaluate(&self, expires_at: Timestamp, now: Timestamp) -> SessionCheck {
        if now >= expires_at {
            return SessionCheck::Expired;
        }
        if now >= expires_at - self.refresh_interval {
            return SessionCheck::Refresh {
                expires_at: self.expiry_from(now),
            };
        }
        SessionCheck::Valid
    }
}
