use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    password::PasswordHash,
    principal::{Principal, Role, UserId},
    revocation::RevocationEntry,
    token::TokenId,
    two_factor::TwoFactorState,
    username::Username,
};

/// Everything the core needs to know about one account.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub principal: Principal,
    pub password_hash: PasswordHash,
    pub two_factor: TwoFactorState,
}

// CredentialStore port trait and errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialStoreError {
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn lookup(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    async fn set_two_factor(
        &self,
        user_id: UserId,
        state: TwoFactorState,
    ) -> Result<(), CredentialStoreError>;

    /// Provision an account with the second factor disabled. Used for first-run seeding.
    async fn create_user(
        &self,
        username: Username,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<Principal, CredentialStoreError>;
}

// RevocationStore port trait and errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevocationStoreError {
    #[error("Revocation store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Atomic check-and-insert. Returns `true` if the id was not revoked before this call.
    ///
    /// Revoking an id twice is a no-op that returns `false`, never an error.
    async fn revoke(&self, entry: RevocationEntry) -> Result<bool, RevocationStoreError>;

    async fn is_revoked(&self, token_id: &TokenId) -> Result<bool, RevocationStoreError>;

    /// Deletes entries whose `expires_at` is before `now` and returns how many went.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, RevocationStoreError>;
}
