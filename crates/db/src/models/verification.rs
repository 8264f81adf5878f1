//! Pending email verification codes.

use sqlx::FromRow;
use taskboard_core::types::Timestamp;

/// A row from the `verifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct Verification {
    pub email: String,
    pub kind: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for issuing (or replacing) the pending code for an email.
#[derive(Debug, Clone)]
pub struct UpsertVerification {
    pub email: String,
    pub kind: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
}
