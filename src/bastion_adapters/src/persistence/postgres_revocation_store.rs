use bastion_core::{RevocationEntry, RevocationStore, RevocationStoreError, TokenId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Shared revocation table. The primary key on `jti` makes check-and-insert one statement.
#[derive(Clone)]
pub struct PostgresRevocationStore {
    pool: PgPool,
}

impl PostgresRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresRevocationStore { pool }
    }
}

fn unavailable(e: sqlx::Error) -> RevocationStoreError {
    RevocationStoreError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl RevocationStore for PostgresRevocationStore {
    #[tracing::instrument(name = "Revoking token in PostgreSQL", skip_all, fields(token_id = %entry.token_id))]
    async fn revoke(&self, entry: RevocationEntry) -> Result<bool, RevocationStoreError> {
        let result = sqlx::query(
            r#"
                INSERT INTO revoked_tokens (jti, expires_at)
                VALUES ($1, $2)
                ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(entry.token_id.to_string())
        .bind(entry.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(name = "Checking revocation in PostgreSQL", skip_all)]
    async fn is_revoked(&self, token_id: &TokenId) -> Result<bool, RevocationStoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)
            "#,
        )
        .bind(token_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }

    #[tracing::instrument(name = "Sweeping revoked tokens in PostgreSQL", skip_all)]
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, RevocationStoreError> {
        let result = sqlx::query(
            r#"
                DELETE FROM revoked_tokens
                WHERE expires_at < $1
            "#,
        )
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected())
    }
}
