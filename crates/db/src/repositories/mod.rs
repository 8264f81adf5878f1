//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod account_repo;
pub mod member_repo;
pub mod project_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;
pub mod verification_repo;
pub mod workspace_repo;

pub use account_repo::AccountRepo;
pub use member_repo::MemberRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use verification_repo::VerificationRepo;
pub use workspace_repo::WorkspaceRepo;
