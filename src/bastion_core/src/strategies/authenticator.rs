use async_trait::async_trait;

use crate::{
    domain::{
        client::ClientAddress,
        context::AuthContext,
        password::Password,
        token::{IssuedToken, TokenPair},
        two_factor::{OneTimeCode, TwoFactorSetup},
        username::Username,
    },
    error::AuthError,
};

// ============================================================================
// Core Authentication Scheme Trait
// ============================================================================

/// The login / login-2FA / refresh / logout state machine exposed at the boundary.
///
/// Every rejection is terminal for the request and comes back as a typed [`AuthError`].
#[async_trait]
pub trait AuthenticationScheme: Send + Sync + 'static {
    /// Verify a username and password.
    ///
    /// Lockout is checked for both the username and the client address before the credential
    /// store is touched.
    async fn login(
        &self,
        username: Username,
        password: Password,
        client: ClientAddress,
    ) -> Result<LoginOutcome, AuthError>;

    /// Exchange a pending-2FA token and a one-time code for the final token pair.
    async fn complete_two_factor(
        &self,
        pending_token: &str,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<TokenPair, AuthError>;

    /// Rotate a refresh token. A refresh token is accepted at most once.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke the access token the request was authenticated with.
    async fn logout(&self, context: &AuthContext) -> Result<(), AuthError>;

    /// Validate a bearer access token and check it has not been revoked.
    async fn authenticate(&self, bearer: &str) -> Result<AuthContext, AuthError>;
}

// ============================================================================
// Login Outcome - Domain Type
// ============================================================================

/// The result of a successful password step.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Second factor disabled, final credentials issued.
    Authenticated(TokenPair),

    /// Password verified, the second factor is still outstanding.
    TwoFactorRequired { pending_token: IssuedToken },
}

// ============================================================================
// Optional Capability: Two-Factor Enrollment
// ============================================================================

#[async_trait]
pub trait SupportsTwoFactorEnrollment: AuthenticationScheme {
    /// Generate and store a new, not yet enabled secret.
    async fn begin_two_factor_setup(
        &self,
        context: &AuthContext,
    ) -> Result<TwoFactorSetup, AuthError>;

    /// Enable the stored secret once the user proves they can generate codes from it.
    async fn confirm_two_factor(
        &self,
        context: &AuthContext,
        code: OneTimeCode,
        client: ClientAddress,
    ) -> Result<(), AuthError>;

    /// Turn the second factor off. Requires the account password.
    async fn disable_two_factor(
        &self,
        context: &AuthContext,
        password: Password,
        client: ClientAddress,
    ) -> Result<(), AuthError>;
}

// ============================================================================
// Optional Capability: Revocation Sweep
// ============================================================================

#[async_trait]
pub trait SupportsRevocationSweep: AuthenticationScheme {
    /// Delete revocation entries whose tokens have expired anyway. Returns how many went.
    async fn sweep_revocations(&self) -> Result<u64, AuthError>;
}
