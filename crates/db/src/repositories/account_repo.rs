//! Repository for the `accounts` table.

use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount};

const COLUMNS: &str = "provider, provider_account_id, user_id, created_at";

pub struct AccountRepo;

impl AccountRepo {
    /// Link an external identity to a user. Relinking the same identity is a no-op.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (provider, provider_account_id, user_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (provider, provider_account_id)
                DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.provider)
            .bind(&input.provider_account_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE provider = $1 AND provider_account_id = $2"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(provider)
            .bind(provider_account_id)
            .fetch_optional(pool)
            .await
    }
}
