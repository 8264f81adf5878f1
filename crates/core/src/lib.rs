pub mod analytics;
pub mod board;
pub mod error;
pub mod hashing;
pub mod roles;
pub mod session;
pub mod task;
pub mod types;
pub mod verification;
pub mod workspace;
