//! Long-running background tasks spawned by `main`.

pub mod session_cleanup;
