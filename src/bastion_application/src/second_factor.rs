use bastion_core::{
    IssuedToken, OneTimeCode, Principal, TokenClaims, TokenError, TokenPurpose, TokenService,
    TotpSecret, TotpVerifier,
};
use chrono::{DateTime, Duration, Utc};

/// Bridges the password step and the code step with a short-lived `pending-2fa` token.
pub struct SecondFactorVerifier<'a, T, V>
where
    T: TokenService,
    V: TotpVerifier,
{
    tokens: &'a T,
    totp: &'a V,
    pending_ttl: Duration,
}

impl<'a, T, V> SecondFactorVerifier<'a, T, V>
where
    T: TokenService,
    V: TotpVerifier,
{
    pub fn new(tokens: &'a T, totp: &'a V, pending_ttl: Duration) -> Self {
        Self {
            tokens,
            totp,
            pending_ttl,
        }
    }

    /// Carries identity only, never the password or the secret.
    pub fn issue_pending_token(&self, principal: &Principal) -> Result<IssuedToken, TokenError> {
        self.tokens
            .issue(principal, TokenPurpose::PendingTwoFactor, self.pending_ttl)
    }

    /// No side effects; lockout accounting stays with the caller.
    pub fn verify_code(&self, secret: &TotpSecret, code: &OneTimeCode, at: DateTime<Utc>) -> bool {
        self.totp.verify(secret, code, at)
    }

    /// Only `pending-2fa` tokens pass, so access or refresh tokens cannot be replayed here.
    pub fn validate_pending_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.tokens.validate(token, TokenPurpose::PendingTwoFactor)
    }
}
