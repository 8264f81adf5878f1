//! Workspace member role name constants.
//!
//! These must match the `CHECK` constraint on `members.role`. The workspace
//! owner is not stored as a member row but is reported as [`ROLE_ADMIN`].

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MEMBER: &str = "MEMBER";
