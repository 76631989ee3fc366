use bastion_core::{
    CredentialRecord, CredentialStore, CredentialStoreError, PasswordHash, Principal, Role,
    TotpSecret, TwoFactorState, UserId, Username,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Row, postgres::PgRow};

#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresCredentialStore { pool }
    }
}

fn unavailable(e: sqlx::Error) -> CredentialStoreError {
    CredentialStoreError::Unavailable(e.to_string())
}

fn record_from_row(row: &PgRow) -> Result<CredentialRecord, CredentialStoreError> {
    let corrupt = |e: String| CredentialStoreError::Unavailable(format!("corrupt user row: {e}"));

    let id: i64 = row.try_get("id").map_err(unavailable)?;
    let username: String = row.try_get("username").map_err(unavailable)?;
    let password_hash: String = row.try_get("password_hash").map_err(unavailable)?;
    let role: String = row.try_get("role").map_err(unavailable)?;
    let totp_secret: Option<String> = row.try_get("totp_secret").map_err(unavailable)?;
    let two_factor_enabled: bool = row.try_get("two_factor_enabled").map_err(unavailable)?;

    let username = Username::parse(username).map_err(|e| corrupt(e.to_string()))?;
    let role = role.parse::<Role>().map_err(|e| corrupt(e.to_string()))?;

    Ok(CredentialRecord {
        principal: Principal::new(UserId::new(id), username, role),
        password_hash: PasswordHash::new(Secret::from(password_hash)),
        two_factor: TwoFactorState {
            secret: totp_secret.map(|s| TotpSecret::new(Secret::from(s))),
            enabled: two_factor_enabled,
        },
    })
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[tracing::instrument(name = "Retrieving credentials from PostgreSQL", skip_all)]
    async fn lookup(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, username, password_hash, role, totp_secret, two_factor_enabled
                FROM users
                WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[tracing::instrument(name = "Updating second factor in PostgreSQL", skip_all)]
    async fn set_two_factor(
        &self,
        user_id: UserId,
        state: TwoFactorState,
    ) -> Result<(), CredentialStoreError> {
        let secret = state
            .secret
            .as_ref()
            .map(|s| s.as_ref().expose_secret().clone());

        let result = sqlx::query(
            r#"
                UPDATE users
                SET totp_secret = $1, two_factor_enabled = $2
                WHERE id = $3
            "#,
        )
        .bind(secret)
        .bind(state.enabled)
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create_user(
        &self,
        username: Username,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<Principal, CredentialStoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
                INSERT INTO users (username, password_hash, role)
                VALUES ($1, $2, $3)
                RETURNING id
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash.as_ref().expose_secret())
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return CredentialStoreError::UserAlreadyExists;
                }
            }
            unavailable(e)
        })?;

        Ok(Principal::new(UserId::new(id), username, role))
    }
}
