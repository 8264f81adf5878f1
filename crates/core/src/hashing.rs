//! Shared SHA-256 hex digest utility.
//!
//! Used for session ids and verification codes so neither raw secret is ever
//! persisted.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 lowercase hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
