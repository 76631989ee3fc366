pub mod domain;
pub mod error;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    client::ClientAddress,
    context::AuthContext,
    error::{ConfigurationError, TokenError, ValidationError},
    lockout::LockoutPolicy,
    password::{Password, PasswordHash},
    principal::{Principal, Role, UserId},
    revocation::RevocationEntry,
    token::{IssuedToken, SignedToken, TokenClaims, TokenId, TokenPair, TokenPolicy, TokenPurpose},
    two_factor::{OneTimeCode, TotpSecret, TwoFactorSetup, TwoFactorState},
    username::Username,
};

pub use error::AuthError;

pub use ports::{
    repositories::{
        CredentialRecord, CredentialStore, CredentialStoreError, RevocationStore,
        RevocationStoreError,
    },
    services::{Clock, PasswordHasher, PasswordHasherError, TokenService, TotpVerifier},
};

pub use strategies::authenticator::{
    AuthenticationScheme, LoginOutcome, SupportsRevocationSweep, SupportsTwoFactorEnrollment,
};
