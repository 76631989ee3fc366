use thiserror::Error;

use crate::{
    domain::{error::TokenError, token::TokenPurpose},
    ports::repositories::{CredentialStoreError, RevocationStoreError},
    ports::services::PasswordHasherError,
};

/// Typed outcome of every rejected authentication request.
///
/// Infrastructure failures surface as `Unavailable` and are never folded into
/// "not revoked" or "not locked out".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Too many failed attempts, try again later")]
    LockedOut,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Expected a {expected} token, got a {actual} token")]
    WrongPurpose {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },
    #[error("Token has already been used")]
    TokenReused,
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Insufficient role")]
    Forbidden,
    #[error("Two-factor authentication is already enabled")]
    TwoFactorAlreadyEnabled,
    #[error("Two-factor authentication setup has not been started")]
    TwoFactorNotEnrolled,
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this rejection belongs to the token-validation family.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::WrongPurpose { .. }
                | AuthError::TokenReused
                | AuthError::TokenRevoked
        )
    }
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid(_) => AuthError::InvalidToken,
            TokenError::WrongPurpose { expected, actual } => {
                AuthError::WrongPurpose { expected, actual }
            }
            TokenError::Signing(e) => AuthError::Internal(e),
        }
    }
}

impl From<CredentialStoreError> for AuthError {
    fn from(error: CredentialStoreError) -> Self {
        match error {
            CredentialStoreError::UserNotFound => AuthError::InvalidCredentials,
            CredentialStoreError::UserAlreadyExists => {
                AuthError::Internal("user already exists".to_string())
            }
            CredentialStoreError::Unavailable(e) => AuthError::Unavailable(e),
        }
    }
}

impl From<RevocationStoreError> for AuthError {
    fn from(error: RevocationStoreError) -> Self {
        match error {
            RevocationStoreError::Unavailable(e) => AuthError::Unavailable(e),
        }
    }
}

impl From<PasswordHasherError> for AuthError {
    fn from(error: PasswordHasherError) -> Self {
        AuthError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_outages_stay_distinct_from_rejections() {
        let error: AuthError = RevocationStoreError::Unavailable("timeout".into()).into();
        assert_eq!(error, AuthError::Unavailable("timeout".into()));
        assert!(!error.is_token_rejection());
    }

    #[test]
    fn token_errors_map_to_token_family() {
        let error: AuthError = TokenError::WrongPurpose {
            expected: TokenPurpose::Access,
            actual: TokenPurpose::Refresh,
        }
        .into();
        assert!(error.is_token_rejection());
        assert!(AuthError::from(TokenError::Invalid("bad".into())).is_token_rejection());
    }
}
