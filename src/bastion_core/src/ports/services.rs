use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    error::TokenError,
    password::{Password, PasswordHash},
    principal::Principal,
    token::{IssuedToken, TokenClaims, TokenPurpose},
    two_factor::{OneTimeCode, TotpSecret},
    username::Username,
};

/// Wall-clock source. Every expiry in the core is computed against it.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Port trait for the password hashing service
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// `Ok(false)` on mismatch. Errors are reserved for unusable hashes.
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}

/// Issues and checks signed, time-bound tokens.
///
/// Validation is pure: it checks signature, algorithm, issuer, expiry and purpose, and never
/// consults revocation state.
pub trait TokenService: Send + Sync {
    fn issue(
        &self,
        principal: &Principal,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError>;

    fn validate(&self, token: &str, expected: TokenPurpose) -> Result<TokenClaims, TokenError>;
}

/// Time-based one-time-code contract.
pub trait TotpVerifier: Send + Sync {
    /// Side-effect free check of `code` at `at`, tolerating one step of drift either way.
    fn verify(&self, secret: &TotpSecret, code: &OneTimeCode, at: DateTime<Utc>) -> bool;

    fn generate_secret(&self) -> TotpSecret;

    fn provisioning_uri(&self, account: &Username, secret: &TotpSecret) -> String;
}
