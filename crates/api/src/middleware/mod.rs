//! Request-scoped authentication.
//!
//! - [`session::resolve_session`] -- Middleware that turns the `session` cookie
//!   into a [`session::CurrentSession`] request extension, refreshing or
//!   clearing the cookie as needed.
//! - [`auth::AuthUser`] -- Extractor that requires a resolved session.

pub mod auth;
pub mod session;
