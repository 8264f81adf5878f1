//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the entity is mutable

pub mod account;
pub mod member;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
pub mod verification;
pub mod workspace;
