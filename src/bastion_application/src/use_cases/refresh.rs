use bastion_core::{
    AuthError, RevocationEntry, RevocationStore, TokenPair, TokenPolicy, TokenPurpose,
    TokenService,
};

use crate::{audit::AuditEvent, use_cases::issue_pair};

/// Refresh-token rotation
pub struct RefreshUseCase<'a, R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    revocations: &'a R,
    tokens: &'a T,
    policy: &'a TokenPolicy,
}

impl<'a, R, T> RefreshUseCase<'a, R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    pub fn new(revocations: &'a R, tokens: &'a T, policy: &'a TokenPolicy) -> Self {
        Self {
            revocations,
            tokens,
            policy,
        }
    }

    /// Execute the refresh use case
    ///
    /// The presented token is revoked before the new pair is issued. Only the caller whose
    /// revoke actually inserted the id gets a pair; every concurrent replay sees `TokenReused`.
    /// A store failure aborts the exchange without issuing anything.
    #[tracing::instrument(name = "RefreshUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .validate(refresh_token, TokenPurpose::Refresh)
            .inspect_err(|e| {
                AuditEvent::TokenRefreshFailure.emit(None, None, &e.to_string());
            })?;

        if self.revocations.is_revoked(&claims.token_id).await? {
            AuditEvent::TokenRefreshFailure.emit(Some(claims.subject_id), None, "token reused");
            return Err(AuthError::TokenReused);
        }

        if !self.revocations.revoke(RevocationEntry::from(&claims)).await? {
            AuditEvent::TokenRefreshFailure.emit(Some(claims.subject_id), None, "token reused");
            return Err(AuthError::TokenReused);
        }

        let pair = issue_pair(self.tokens, &claims.principal(), self.policy)?;
        AuditEvent::TokenRefreshSuccess.emit(Some(claims.subject_id), None, "");

        Ok(pair)
    }
}
