//! One-time email verification codes.
//!
//! Codes are six decimal digits. Only the SHA-256 hex digest is stored, next
//! to an expiry; one pending code exists per email address.

use rand::Rng;

use crate::error::CoreError;
use crate::hashing::sha256_hex;
use crate::types::Timestamp;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Default code lifetime in seconds (`EMAIL_CONFIRMATION_EXPIRES`).
pub const DEFAULT_CODE_EXPIRY_SECS: i64 = 600;

/// Verification kind for sign-up email confirmation.
pub const KIND_EMAIL_VERIFICATION: &str = "EMAIL_VERIFICATION";

/// A generated code and the digest to persist.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub code_hash: String,
}

/// Generate a zero-padded six-digit code.
pub fn generate_code() -> IssuedCode {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    let code = format!("{n:0width$}", width = CODE_LENGTH);
    let code_hash = hash_code(&code);
    IssuedCode { code, code_hash }
}

pub fn hash_code(code: &str) -> String {
    sha256_hex(code.trim().as_bytes())
}

/// Whether a stored code is still usable at `now`.
pub fn is_pending(expires_at: Timestamp, now: Timestamp) -> bool {
    now < expires_at
}

/// Check a submitted code against the stored digest and expiry.
pub fn check_code(
    submitted: &str,
    stored_hash: &str,
    expires_at: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if !is_pending(expires_at, now) || hash_code(submitted) != stored_hash {
        return Err(CoreError::invalid_code());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn code_is_six_digits() {
        for _ in 0..50 {
            let issued = generate_code();
            assert_eq!(issued.code.len(), CODE_LENGTH);
            assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(issued.code_hash, hash_code(&issued.code));
        }
    }

    #[test]
    fn matching_code_within_expiry_passes() {
        let now = Utc::now();
        let issued = generate_code();
        let expires = now + Duration::seconds(DEFAULT_CODE_EXPIRY_SECS);
        assert!(check_code(&issued.code, &issued.code_hash, expires, now).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let now = Utc::now();
        let hash = hash_code("123456");
        assert!(check_code(" 123456 ", &hash, now + Duration::minutes(1), now).is_ok());
    }

    #[test]
    fn wrong_code_is_rejected() {
        let now = Utc::now();
        let hash = hash_code("123456");
        let err = check_code("654321", &hash, now + Duration::minutes(1), now).unwrap_err();
        assert_matches!(err, CoreError::Token(_));
    }

    #[test]
    fn expired_code_is_rejected() {
        let now = Utc::now();
        let hash = hash_code("123456");
        let err = check_code("123456", &hash, now - Duration::seconds(1), now).unwrap_err();
        assert_matches!(err, CoreError::Token(_));
    }
}
