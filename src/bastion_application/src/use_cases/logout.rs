use bastion_core::{AuthContext, AuthError, RevocationEntry, RevocationStore};

use crate::audit::AuditEvent;

/// Logout use case - revokes the access token the request was made with
pub struct LogoutUseCase<'a, R>
where
    R: RevocationStore,
{
    revocations: &'a R,
}

impl<'a, R> LogoutUseCase<'a, R>
where
    R: RevocationStore,
{
    pub fn new(revocations: &'a R) -> Self {
        Self { revocations }
    }

    /// Only the presented access token is revoked. The paired refresh token stays valid
    /// until it is rotated or expires.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all, fields(user_id = %context.principal.id))]
    pub async fn execute(&self, context: &AuthContext) -> Result<(), AuthError> {
        let entry = RevocationEntry::new(context.token_id.clone(), context.expires_at);
        if !self.revocations.revoke(entry).await? {
            tracing::debug!(token_id = %context.token_id, "Token was already revoked");
        }

        AuditEvent::LogoutSuccess.emit(Some(context.principal.id), None, "");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bastion_core::{TokenPurpose, TokenService};
    use chrono::Duration;

    use super::*;
    use crate::test_support::{TestHarness, principal};

    #[tokio::test]
    async fn test_logout_revokes_access_token_and_is_idempotent() {
        let harness = TestHarness::new();
        let access = harness
            .tokens
            .issue(&principal(1, "alice"), TokenPurpose::Access, Duration::minutes(15))
            .unwrap();
        let context = AuthContext::from(access.claims.clone());
        let use_case = LogoutUseCase::new(&harness.revocations);

        use_case.execute(&context).await.unwrap();
        use_case.execute(&context).await.unwrap();

        assert!(
            harness
                .revocations
                .is_revoked(&access.claims.token_id)
                .await
                .unwrap()
        );
    }
}
