use thiserror::Error;

use crate::domain::token::TokenPurpose;

/// Malformed input at the boundary. Never reaches the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username must be 3 to 64 characters of letters, digits, '_', '.', '@' or '-'")]
    InvalidUsername,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Code must be exactly 6 digits")]
    InvalidOneTimeCode,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Startup-fatal configuration problems. Surfaced once, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Signing key is missing")]
    MissingSigningKey,
    #[error("Signing key must be at least {min} bytes, got {actual}")]
    WeakSigningKey { min: usize, actual: usize },
    #[error("Token lifetime for {0} must be positive")]
    NonPositiveTtl(TokenPurpose),
    #[error("Token lifetime for {0} must not exceed one year")]
    TtlTooLong(TokenPurpose),
    #[error("Invalid lockout policy: {0}")]
    InvalidLockoutPolicy(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Failures of the stateless token check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Expected a {expected} token, got a {actual} token")]
    WrongPurpose {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },
    #[error("Failed to sign token: {0}")]
    Signing(String),
}
