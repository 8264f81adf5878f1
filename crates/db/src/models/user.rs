//! User model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub email_verified_at: Option<Timestamp>,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// Public subset of a user embedded in other responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

/// DTO for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    /// Set for users whose email a trusted provider already verified.
    pub email_verified_at: Option<Timestamp>,
    pub image: Option<String>,
}

/// DTO for profile updates. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub image: Option<String>,
}
