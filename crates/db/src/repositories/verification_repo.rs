//! Repository for the `verifications` table.

use sqlx::PgPool;

use crate::models::verification::{UpsertVerification, Verification};

const COLUMNS: &str = "email, kind, code_hash, expires_at, created_at";

/// One pending code per email; issuing a new one replaces the old.
pub struct VerificationRepo;

impl VerificationRepo {
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertVerification,
    ) -> Result<Verification, sqlx::Error> {
        let query = format!(
            "INSERT INTO verifications (email, kind, code_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO UPDATE SET
                kind = EXCLUDED.kind,
                code_hash = EXCLUDED.code_hash,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Verification>(&query)
            .bind(&input.email)
            .bind(&input.kind)
            .bind(&input.code_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Verification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM verifications WHERE email = $1");
        sqlx::query_as::<_, Verification>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verifications WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
