//! External identity provider links.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

pub const PROVIDER_GOOGLE: &str = "google";

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub provider: String,
    pub provider_account_id: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub provider: String,
    pub provider_account_id: String,
    pub user_id: DbId,
}
