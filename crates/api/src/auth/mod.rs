//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Session issuance, validation with sliding refresh, revocation.
//! - [`cookie`] -- `Cookie` parsing and `Set-Cookie` formatting.
//! - [`oauth`] -- Google sign-in with state and PKCE.

pub mod cookie;
pub mod oauth;
pub mod password;
pub mod session;
